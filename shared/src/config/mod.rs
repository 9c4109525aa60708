//! Configuration module with per-concern sub-modules
//!
//! Every value has a default and an environment-variable override:
//! - `upstream` - provider base URL, timeouts, retry and keep-alive policy
//! - `cache` - per-operation cache TTLs and the backing store
//! - `circuit_breaker` - failure threshold and cooldown
//! - `performance` - connection pool size and batch concurrency ceiling
//! - `rate_limit` - per-action request limits
//! - `environment` - environment detection and logging configuration
//! - `server` - HTTP bind address

pub mod cache;
pub mod circuit_breaker;
pub mod environment;
pub mod performance;
pub mod rate_limit;
pub mod server;
pub mod upstream;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::{CacheConfig, StoreBackend, StoreConfig};
pub use circuit_breaker::CircuitBreakerConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use performance::PerformanceConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

/// Configuration validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("connect timeout ({connect}s) cannot exceed total timeout ({total}s)")]
    ConnectTimeoutTooLong { connect: u64, total: u64 },
}

/// Complete proxy configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProxyConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub store: StoreConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub performance: PerformanceConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

impl ProxyConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env(),
            upstream: UpstreamConfig::from_env(),
            cache: CacheConfig::from_env(),
            store: StoreConfig::from_env(),
            circuit_breaker: CircuitBreakerConfig::from_env(),
            performance: PerformanceConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }

    /// Reject settings the proxy cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::Empty { field: "upstream.base_url" });
        }
        if self.upstream.connect_timeout_secs > self.upstream.timeout_secs {
            return Err(ConfigError::ConnectTimeoutTooLong {
                connect: self.upstream.connect_timeout_secs,
                total: self.upstream.timeout_secs,
            });
        }
        if self.circuit_breaker.threshold == 0 {
            return Err(ConfigError::Zero { field: "circuit_breaker.threshold" });
        }
        if self.performance.concurrent_requests == 0 {
            return Err(ConfigError::Zero { field: "performance.concurrent_requests" });
        }
        if self.performance.connection_pool_size == 0 {
            return Err(ConfigError::Zero { field: "performance.connection_pool_size" });
        }
        Ok(())
    }
}

/// Read and parse an environment variable, using `default` when it is unset or malformed
pub(crate) fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a string environment variable, using `default` when it is unset or blank
pub(crate) fn env_string(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
