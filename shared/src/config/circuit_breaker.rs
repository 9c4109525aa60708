//! Circuit breaker configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Circuit breaker thresholds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub threshold: u32,

    /// Seconds after the last failure before the circuit closes again
    pub cooldown_secs: u64,

    /// Expiry of the stored counters, independent of the cooldown
    pub counter_ttl_secs: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            threshold: 5,
            cooldown_secs: 60,
            counter_ttl_secs: 300,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            threshold: env_or("SMS_CIRCUIT_BREAKER_THRESHOLD", defaults.threshold),
            cooldown_secs: env_or("SMS_CIRCUIT_BREAKER_TIMEOUT", defaults.cooldown_secs),
            counter_ttl_secs: env_or("SMS_CIRCUIT_BREAKER_COUNTER_TTL", defaults.counter_ttl_secs),
        }
    }
}
