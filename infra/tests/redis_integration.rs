//! Integration tests for the Redis cache store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p sp_infra --test redis_integration -- --ignored

use sp_core::repositories::CacheStore;
use sp_infra::cache::RedisCacheStore;
use sp_shared::config::StoreConfig;

fn config() -> StoreConfig {
    StoreConfig::redis(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_redis_connection() {
    let store = RedisCacheStore::new(&config()).await;
    assert!(store.is_ok(), "Failed to connect to Redis");
    assert!(store.unwrap().health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_set_get_delete() {
    let store = RedisCacheStore::new(&config()).await.unwrap();
    let key = "test:sms:token:1001";

    store
        .set_with_expiry(key, r#"{"code":"ok","sms":"1234"}"#, 60)
        .await
        .unwrap();
    assert_eq!(
        store.get(key).await.unwrap(),
        Some(r#"{"code":"ok","sms":"1234"}"#.to_string())
    );

    assert!(store.delete(key).await.unwrap());
    assert_eq!(store.get(key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_expiry() {
    let store = RedisCacheStore::new(&config()).await.unwrap();
    let key = "test:status:token:1001";

    store.set_with_expiry(key, "{}", 1).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    assert_eq!(store.get(key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_increment_applies_ttl() {
    let store = RedisCacheStore::new(&config()).await.unwrap();
    let key = "test:circuit:sms_api:failures";
    let _ = store.delete(key).await;

    assert_eq!(store.increment(key, 300).await.unwrap(), 1);
    assert_eq!(store.increment(key, 300).await.unwrap(), 2);

    let client = redis::Client::open(config().url).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let ttl: i64 = redis::cmd("TTL").arg(key).query_async(&mut conn).await.unwrap();
    assert!(ttl > 0 && ttl <= 300);

    store.delete(key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_window_increment_keeps_ttl() {
    let store = RedisCacheStore::new(&config()).await.unwrap();
    let key = "test:rate_limit:getSms:127.0.0.1";
    let _ = store.delete(key).await;

    assert_eq!(store.increment_in_window(key, 60).await.unwrap(), 1);
    assert_eq!(store.increment_in_window(key, 600).await.unwrap(), 2);

    let client = redis::Client::open(config().url).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let ttl: i64 = redis::cmd("TTL").arg(key).query_async(&mut conn).await.unwrap();
    assert!(ttl > 0 && ttl <= 60);

    store.delete(key).await.unwrap();
}
