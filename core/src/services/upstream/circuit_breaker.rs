//! Circuit breaker backed by cache store counters

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::CacheError;
use crate::repositories::CacheStore;

use super::config::BreakerConfig;
use super::traits::Clock;

/// Observable breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitState {
    Closed,
    Open,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circuit breaker whose state is a pure function of two stored values.
///
/// The failure count and the unix time of the last failure are re-read from
/// the store on every check, so any number of processes sharing the store
/// agree on the state. There is no half-open state: once the cooldown has
/// elapsed the next check clears both counters and lets calls through.
pub struct CircuitBreaker {
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    config: BreakerConfig,
}

impl CircuitBreaker {
    pub fn new(cache: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, config: BreakerConfig) -> Self {
        Self {
            cache,
            clock,
            config,
        }
    }

    pub fn failures_key(&self) -> String {
        format!("{}:failures", self.config.key)
    }

    pub fn last_failure_key(&self) -> String {
        format!("{}:last_failure", self.config.key)
    }

    /// Whether calls must be rejected right now.
    ///
    /// A store read failure is treated as closed.
    pub async fn is_open(&self) -> bool {
        let failures = match self.read_i64(&self.failures_key()).await {
            Ok(count) => count.unwrap_or(0),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read circuit breaker counter, assuming closed");
                return false;
            }
        };

        if failures < i64::from(self.config.threshold) {
            return false;
        }

        let last_failure = match self.read_i64(&self.last_failure_key()).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read circuit breaker timestamp, assuming closed");
                return false;
            }
        };

        if let Some(last_failure) = last_failure {
            let elapsed = self.clock.now().timestamp() - last_failure;
            if elapsed < self.config.cooldown_secs as i64 {
                return true;
            }
        }

        self.reset().await;
        tracing::info!(
            failures = failures,
            cooldown_secs = self.config.cooldown_secs,
            "Circuit breaker cooldown elapsed, counters reset"
        );
        false
    }

    pub async fn state(&self) -> CircuitState {
        if self.is_open().await {
            CircuitState::Open
        } else {
            CircuitState::Closed
        }
    }

    /// Count a failed call and stamp its time
    pub async fn record_failure(&self) {
        let ttl = self.config.counter_ttl_secs;

        match self.cache.increment(&self.failures_key(), ttl).await {
            Ok(count) if count == i64::from(self.config.threshold) => {
                tracing::warn!(
                    failures = count,
                    cooldown_secs = self.config.cooldown_secs,
                    "Circuit breaker opened"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Failed to increment circuit breaker counter");
            }
        }

        let now = self.clock.now().timestamp().to_string();
        if let Err(e) = self
            .cache
            .set_with_expiry(&self.last_failure_key(), &now, ttl)
            .await
        {
            tracing::warn!(error = %e, "Failed to record circuit breaker failure time");
        }
    }

    /// Reset the failure count after a successful call
    pub async fn record_success(&self) {
        if let Err(e) = self
            .cache
            .set_with_expiry(&self.failures_key(), "0", self.config.counter_ttl_secs)
            .await
        {
            tracing::warn!(error = %e, "Failed to reset circuit breaker counter");
        }
    }

    async fn reset(&self) {
        for key in [self.failures_key(), self.last_failure_key()] {
            if let Err(e) = self.cache.delete(&key).await {
                tracing::warn!(error = %e, key = %key, "Failed to clear circuit breaker counter");
            }
        }
    }

    /// Read an integer value; unparsable values count as absent
    async fn read_i64(&self, key: &str) -> Result<Option<i64>, CacheError> {
        Ok(self
            .cache
            .get(key)
            .await?
            .and_then(|raw| raw.trim().parse::<i64>().ok()))
    }
}
