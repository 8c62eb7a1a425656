pub mod entities;

pub use entities::{Assignment, UNLIMITED_SUBMISSIONS};
