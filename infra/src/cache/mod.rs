//! Cache store implementations
//!
//! Both stores implement the core `CacheStore` trait. The Redis store is the
//! production backend; the in-memory store keeps the same TTL and atomic
//! increment semantics inside one process.

pub mod memory_store;
pub mod redis_store;


pub use memory_store::MemoryCacheStore;
pub use redis_store::RedisCacheStore;
