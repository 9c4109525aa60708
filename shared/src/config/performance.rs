//! Connection pool and concurrency limits

use serde::{Deserialize, Serialize};

use super::env_or;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PerformanceConfig {
    /// Maximum idle connections kept per upstream host
    pub connection_pool_size: usize,

    /// Maximum in-flight upstream requests for a batch call
    pub concurrent_requests: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            connection_pool_size: 100,
            concurrent_requests: 50,
        }
    }
}

impl PerformanceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            connection_pool_size: env_or("SMS_CONNECTION_POOL_SIZE", defaults.connection_pool_size),
            concurrent_requests: env_or("SMS_CONCURRENT_REQUESTS", defaults.concurrent_requests),
        }
    }
}
