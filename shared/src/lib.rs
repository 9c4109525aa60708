//! Shared configuration and payload types for the SMS proxy
//!
//! This crate provides functionality used across all server crates:
//! - Configuration loaded from the environment
//! - The `{code, message}` error payload returned to clients
//! - Small helpers such as token masking for logs

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    CacheConfig, CircuitBreakerConfig, ConfigError, Environment, LogFormat, LoggingConfig,
    PerformanceConfig, ProxyConfig, RateLimitConfig, ServerConfig, StoreBackend, StoreConfig,
    UpstreamConfig,
};
pub use errors::{ErrorResponse, IntoErrorResponse};
pub use utils::mask_token;
