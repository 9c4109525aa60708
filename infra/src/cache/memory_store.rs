//! In-process cache store
//!
//! Same semantics as the Redis store (per-key expiry, atomic increments)
//! without any shared state across processes. Suitable for local development
//! and tests.
//!
//! Expired entries are removed when a read finds them and by a sweep that
//! runs every [`SWEEP_INTERVAL`] writes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use sp_core::errors::CacheError;
use sp_core::repositories::CacheStore;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn new(value: String, ttl_seconds: u64) -> Self {
        Self {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Writes between two sweeps of expired entries
pub const SWEEP_INTERVAL: u64 = 256;

/// Cache store backed by a `HashMap` behind an async lock
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
    writes: AtomicU64,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unexpired entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of stored entries, expired ones included
    pub async fn stored_entries(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        Self::sweep(&mut entries, Instant::now())
    }

    fn sweep(entries: &mut HashMap<String, Entry>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed = removed, remaining = entries.len(), "Swept expired cache entries");
        }
        removed
    }

    /// Count a write and sweep when the interval is reached
    fn after_write(&self, entries: &mut HashMap<String, Entry>, now: Instant) {
        let writes = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        if writes % SWEEP_INTERVAL == 0 {
            Self::sweep(entries, now);
        }
    }

    /// Parse the live counter at `key`, dropping it if it has expired
    fn live_counter(
        entries: &mut HashMap<String, Entry>,
        key: &str,
        now: Instant,
    ) -> Result<Option<(i64, Instant)>, CacheError> {
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => {
                let count = entry.value.trim().parse::<i64>().map_err(|_| {
                    CacheError::Operation(format!("value at '{}' is not an integer", key))
                })?;
                Ok(Some((count, entry.expires_at)))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it unless a writer replaced it meanwhile
        let mut entries = self.entries.write().await;
        if entries.get(key).map_or(false, |entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry::new(value.to_string(), ttl_seconds));
        self.after_write(&mut entries, Instant::now());
        Ok(())
    }

    async fn increment(&self, key: &str, ttl_seconds: u64) -> Result<i64, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let current = Self::live_counter(&mut entries, key, now)?.map_or(0, |(count, _)| count);
        let next = current + 1;
        entries.insert(key.to_string(), Entry::new(next.to_string(), ttl_seconds));
        self.after_write(&mut entries, now);
        Ok(next)
    }

    async fn increment_in_window(&self, key: &str, window_seconds: u64) -> Result<i64, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let (next, expires_at) = match Self::live_counter(&mut entries, key, now)? {
            Some((count, expires_at)) => (count + 1, expires_at),
            None => (1, now + Duration::from_secs(window_seconds)),
        };
        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at,
            },
        );
        self.after_write(&mut entries, now);
        Ok(next)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let now = Instant::now();
        Ok(self
            .entries
            .write()
            .await
            .remove(key)
            .map(|entry| entry.is_live(now))
            .unwrap_or(false))
    }
}
