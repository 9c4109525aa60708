//! HTTP boundary of the SMS proxy
//!
//! Exposed as a library so integration tests can build the application
//! with in-memory collaborators.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{build_proxy_service, create_app};
pub use routes::AppState;
