pub mod entities;

pub use entities::{Registration, RegistrationRole};
