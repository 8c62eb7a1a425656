pub mod auth;

pub mod submissions;

pub mod system;

pub mod workers;

pub use auth::configure_auth_routes;
pub use submissions::configure_submission_routes;
pub use system::configure_system_routes;
pub use workers::configure_worker_routes;
