//! # SMS Proxy Core
//!
//! Domain layer of the SMS proxy. This crate contains the upstream request and
//! response values, the error taxonomy, the collaborator traits for the cache
//! store and HTTP transport, the circuit breaker, the retrying upstream client
//! and the caching orchestration service built on top of it.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
