//! Upstream client module
//!
//! This module provides everything needed to talk to the SMS provider:
//! - Transport and clock abstractions supplied by the infrastructure layer
//! - Exponential backoff retry for transport failures and 5xx responses
//! - A circuit breaker whose state lives entirely in the cache store
//! - Single and bounded-concurrency batch calls

mod circuit_breaker;
mod client;
mod config;
mod retry;
mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use client::UpstreamClient;
pub use config::{BreakerConfig, UpstreamClientConfig, DEFAULT_BREAKER_KEY};
pub use retry::RetryPolicy;
pub use traits::{Clock, HttpTransport, SystemClock, TransportResponse};
