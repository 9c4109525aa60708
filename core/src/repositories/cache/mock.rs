//! Mock implementation of CacheStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::errors::CacheError;

use super::r#trait::CacheStore;

/// In-memory store that records the TTL of every write.
///
/// Entries never expire on their own; tests inspect [`MockCacheStore::ttl_of`]
/// instead of waiting.
#[derive(Default)]
pub struct MockCacheStore {
    entries: Mutex<HashMap<String, (String, u64)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get` fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write (`set_with_expiry`, `increment`, `delete`) fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn value_of(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    pub fn ttl_of(&self, key: &str) -> Option<u64> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    /// Seed a value directly, bypassing failure toggles
    pub fn insert(&self, key: &str, value: &str, ttl: u64) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
    }

    fn check_writes(&self) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Connection("mock store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MockCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Connection("mock store unavailable".to_string()));
        }
        Ok(self.value_of(key))
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        self.check_writes()?;
        self.insert(key, value, ttl_seconds);
        Ok(())
    }

    async fn increment(&self, key: &str, ttl_seconds: u64) -> Result<i64, CacheError> {
        self.check_writes()?;
        let mut entries = self.entries.lock().unwrap();
        let current = match entries.get(key) {
            Some((value, _)) => value
                .parse::<i64>()
                .map_err(|e| CacheError::Operation(e.to_string()))?,
            None => 0,
        };
        let next = current + 1;
        entries.insert(key.to_string(), (next.to_string(), ttl_seconds));
        Ok(next)
    }

    async fn increment_in_window(&self, key: &str, window_seconds: u64) -> Result<i64, CacheError> {
        self.check_writes()?;
        let mut entries = self.entries.lock().unwrap();
        let (current, ttl) = match entries.get(key) {
            Some((value, ttl)) => (
                value
                    .parse::<i64>()
                    .map_err(|e| CacheError::Operation(e.to_string()))?,
                *ttl,
            ),
            None => (0, window_seconds),
        };
        let next = current + 1;
        entries.insert(key.to_string(), (next.to_string(), ttl));
        Ok(next)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.check_writes()?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}
