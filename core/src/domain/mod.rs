//! Domain layer containing the upstream request/response values and cached entities.

pub mod entities;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::*;
pub use value_objects::*;
