//! Services: the resilient upstream client and the caching proxy built on it.

pub mod proxy;
pub mod upstream;

// Re-export commonly used types
pub use proxy::{CachePolicy, CachePolicyTable, ProxyService};
pub use upstream::{
    BreakerConfig, CircuitBreaker, CircuitState, Clock, HttpTransport, RetryPolicy, SystemClock,
    TransportResponse, UpstreamClient, UpstreamClientConfig,
};
