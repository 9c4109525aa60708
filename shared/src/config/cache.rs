//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, env_string};

/// Per-operation cache lifetimes, in seconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Lifetime of activation records written after a number is obtained
    pub default_ttl: u64,

    /// SMS result while no code has arrived yet
    pub sms_ttl: u64,

    /// SMS result once a code has been received
    pub sms_received_ttl: u64,

    /// Pending activation status
    pub status_ttl: u64,

    /// Finished or canceled activation status
    pub status_terminal_ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: 300,
            sms_ttl: 10,
            sms_received_ttl: 60,
            status_ttl: 15,
            status_terminal_ttl: 3600,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env_or("SMS_CACHE_TTL", defaults.default_ttl),
            sms_ttl: env_or("SMS_CACHE_SMS_TTL", defaults.sms_ttl),
            sms_received_ttl: env_or("SMS_CACHE_SMS_RECEIVED_TTL", defaults.sms_received_ttl),
            status_ttl: env_or("SMS_CACHE_STATUS_TTL", defaults.status_ttl),
            status_terminal_ttl: env_or(
                "SMS_CACHE_STATUS_TERMINAL_TTL",
                defaults.status_terminal_ttl,
            ),
        }
    }
}

/// Key-value store implementation backing the cache and breaker counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    /// In-process store, only suitable for a single instance
    Memory,
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Redis
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" | "in-memory" | "inmemory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid cache backend: {}", s)),
        }
    }
}

/// Backing store connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Redis connection URL
    pub url: String,

    /// Retries for transient Redis errors
    pub max_retries: u32,

    /// Delay before the first Redis retry in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::from("redis://localhost:6379"),
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: env_or("CACHE_BACKEND", defaults.backend),
            url: env_string("REDIS_URL", &defaults.url),
            ..defaults
        }
    }

    /// Create a Redis-backed configuration with URL
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Redis,
            url: url.into(),
            ..Default::default()
        }
    }
}
