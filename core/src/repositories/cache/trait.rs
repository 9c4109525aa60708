//! Key-value store trait shared by the response cache and the circuit breaker.

use async_trait::async_trait;

use crate::errors::CacheError;

/// Key-value store with per-key expiry.
///
/// All proxy state lives behind this trait, so several proxy instances that
/// share one store observe the same cache entries and breaker counters.
/// Callers treat every error as a miss or a skipped write; a failing store
/// never fails a request on its own.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Key exists and has not expired
    /// * `Ok(None)` - Key is absent or expired
    /// * `Err(CacheError)` - Store unreachable or command failed
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a value that expires after `ttl_seconds`
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64)
        -> Result<(), CacheError>;

    /// Atomically increment the integer stored at `key` and (re)apply the expiry
    ///
    /// An absent key counts as zero, so the first call returns 1.
    async fn increment(&self, key: &str, ttl_seconds: u64) -> Result<i64, CacheError>;

    /// Atomically increment a fixed-window counter
    ///
    /// The expiry is set only when the call creates the key; later
    /// increments leave the remaining window untouched.
    async fn increment_in_window(&self, key: &str, window_seconds: u64) -> Result<i64, CacheError>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;
}
