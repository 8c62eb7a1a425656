pub mod auth;
pub mod submissions;
pub mod system;
pub mod workers;

pub use auth::AuthService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use workers::WorkerService;
