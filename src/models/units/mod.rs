pub mod entities;

pub use entities::Unit;
