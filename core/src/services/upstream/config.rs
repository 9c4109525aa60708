//! Configuration for the upstream client and circuit breaker

use std::time::Duration;

use sp_shared::config::ProxyConfig;

use super::retry::RetryPolicy;

/// Key prefix for the breaker counters in the cache store
pub const DEFAULT_BREAKER_KEY: &str = "circuit:sms_api";

/// Circuit breaker settings
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Counters live under `{key}:failures` and `{key}:last_failure`
    pub key: String,
    /// Failures that open the circuit
    pub threshold: u32,
    /// Seconds since the last failure during which the circuit stays open
    pub cooldown_secs: u64,
    /// Expiry applied to both counters on every write
    pub counter_ttl_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_BREAKER_KEY.to_string(),
            threshold: 5,
            cooldown_secs: 60,
            counter_ttl_secs: 300,
        }
    }
}

/// Configuration for the upstream client
#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    pub retry: RetryPolicy,
    pub breaker: BreakerConfig,
    /// Maximum in-flight requests for `call_many`
    pub concurrency: usize,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            breaker: BreakerConfig::default(),
            concurrency: 50,
        }
    }
}

impl From<&ProxyConfig> for UpstreamClientConfig {
    fn from(config: &ProxyConfig) -> Self {
        Self {
            retry: RetryPolicy::new(
                config.upstream.max_retries,
                Duration::from_millis(config.upstream.retry_base_delay_ms),
            ),
            breaker: BreakerConfig {
                key: DEFAULT_BREAKER_KEY.to_string(),
                threshold: config.circuit_breaker.threshold,
                cooldown_secs: config.circuit_breaker.cooldown_secs,
                counter_ttl_secs: config.circuit_breaker.counter_ttl_secs,
            },
            concurrency: config.performance.concurrent_requests,
        }
    }
}
