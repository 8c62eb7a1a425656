pub mod lifetime;
pub mod serve;
