//! Redis-backed cache store
//!
//! Provides the shared store for cached upstream responses, activation
//! records, circuit breaker counters and rate limit windows. Operations run on
//! a multiplexed connection and transient Redis errors are retried with
//! exponential backoff.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use sp_core::errors::CacheError;
use sp_core::repositories::CacheStore;
use sp_shared::config::StoreConfig;

use crate::InfrastructureError;

/// Upper bound for the backoff between Redis retries
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache store with retry logic
///
/// Cloning is cheap; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisCacheStore {
    connection: MultiplexedConnection,
    /// Maximum number of attempts per operation
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisCacheStore {
    /// Connect to Redis using the store configuration
    ///
    /// # Returns
    /// * `Ok(Self)` - Connected store
    /// * `Err(InfrastructureError::Config)` - The URL could not be parsed
    /// * `Err(InfrastructureError::Cache)` - Connecting failed after all retries
    pub async fn new(config: &StoreConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis cache store");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let max_retries = config.max_retries.max(1);
        let connection =
            Self::create_connection_with_retry(client, max_retries, config.retry_delay_ms).await?;

        info!("Redis cache store ready");

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        attempt = attempts,
                        max_retries = max_retries,
                        delay_ms = delay,
                        error = %e,
                        "Failed to connect to Redis, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(attempts = attempts, error = %e, "Failed to connect to Redis");
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Check that Redis answers PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if response != "PONG" {
            warn!(response = %response, "Unexpected Redis PING response");
            return Ok(false);
        }
        Ok(true)
    }

    /// Run an operation, retrying transient errors with exponential backoff
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        attempt = attempts,
                        max_retries = self.max_retries,
                        delay_ms = delay,
                        error = %e,
                        "Redis operation failed, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let owned = key.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = owned.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| to_cache_error("GET", key, e))
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let (owned_key, owned_value) = (key.to_string(), value.to_string());
        self.execute_with_retry(move |mut conn| {
            let (key, value) = (owned_key.clone(), owned_value.clone());
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await })
        })
        .await
        .map_err(|e| to_cache_error("SETEX", key, e))
    }

    async fn increment(&self, key: &str, ttl_seconds: u64) -> Result<i64, CacheError> {
        let owned = key.to_string();
        let (count,): (i64,) = self
            .execute_with_retry(move |mut conn| {
                let key = owned.clone();
                Box::pin(async move {
                    redis::pipe()
                        .atomic()
                        .incr(&key, 1)
                        .expire(&key, ttl_seconds as i64)
                        .ignore()
                        .query_async::<_, (i64,)>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| to_cache_error("INCR", key, e))?;

        Ok(count)
    }

    async fn increment_in_window(&self, key: &str, window_seconds: u64) -> Result<i64, CacheError> {
        let owned = key.to_string();
        let (count,): (i64,) = self
            .execute_with_retry(move |mut conn| {
                let key = owned.clone();
                Box::pin(async move {
                    // SET NX only creates the key, INCR keeps the existing TTL
                    redis::pipe()
                        .atomic()
                        .cmd("SET")
                        .arg(&key)
                        .arg(0)
                        .arg("EX")
                        .arg(window_seconds)
                        .arg("NX")
                        .ignore()
                        .incr(&key, 1)
                        .query_async::<_, (i64,)>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| to_cache_error("INCR", key, e))?;

        Ok(count)
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let owned = key.to_string();
        let deleted = self
            .execute_with_retry(move |mut conn| {
                let key = owned.clone();
                Box::pin(async move { conn.del::<_, i64>(key).await })
            })
            .await
            .map_err(|e| to_cache_error("DEL", key, e))?;

        Ok(deleted > 0)
    }
}

/// Map a Redis failure onto the core cache error, logging it once.
///
/// Keys embed API tokens, so only the key prefix is logged.
fn to_cache_error(command: &str, key: &str, error: RedisError) -> CacheError {
    error!(command = command, key_prefix = key_prefix(key), error = %error, "Redis command failed");

    if error.is_io_error() || error.is_connection_dropped() || error.is_connection_refusal() {
        CacheError::Connection(error.to_string())
    } else {
        CacheError::Operation(error.to_string())
    }
}

fn key_prefix(key: &str) -> &str {
    key.split(':').next().unwrap_or(key)
}

/// Check if a Redis error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.find('@'), url.find("://")) {
        return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
    }
    url.to_string()
}
