//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the proxy core depends on:
//! - **Cache**: Redis-backed store shared between instances, and an in-process
//!   store for development and tests
//! - **HTTP**: connection-pooled reqwest transport pointed at the provider
//!
//! The factory functions below pick and build the implementations from
//! configuration so the API crate only deals with trait objects.

use std::sync::Arc;

use sp_core::repositories::CacheStore;
use sp_core::services::HttpTransport;
use sp_shared::config::{ProxyConfig, StoreBackend, StoreConfig};

/// Cache module - Redis and in-memory stores
pub mod cache;

/// HTTP module - upstream transport
pub mod http;

pub use cache::{MemoryCacheStore, RedisCacheStore};
pub use http::ReqwestTransport;

/// Build the cache store selected by `config.backend`
pub async fn create_cache_store(
    config: &StoreConfig,
) -> Result<Arc<dyn CacheStore>, InfrastructureError> {
    match config.backend {
        StoreBackend::Redis => {
            let store: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::new(config).await?);
            Ok(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory cache store; state is not shared between instances");
            let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
            Ok(store)
        }
    }
}

/// Build the pooled HTTP transport for the provider
pub fn create_transport(config: &ProxyConfig) -> Result<Arc<dyn HttpTransport>, InfrastructureError> {
    let transport: Arc<dyn HttpTransport> =
        Arc::new(ReqwestTransport::new(&config.upstream, &config.performance)?);
    Ok(transport)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
