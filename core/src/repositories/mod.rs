pub mod cache;

pub use cache::CacheStore;

#[cfg(test)]
pub use cache::MockCacheStore;
