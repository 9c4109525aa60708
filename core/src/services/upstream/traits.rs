//! Traits for HTTP transport and time source integration

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::TransportError;

/// Raw HTTP response as read off the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait for the pooled HTTP client used to reach the provider
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET against the provider endpoint with the given query pairs.
    ///
    /// Any HTTP status is a successful transport outcome; only failures that
    /// prevent reading a response are reported as `TransportError`. Dropping
    /// the returned future must abort the outbound request.
    async fn get(&self, query: &[(String, String)]) -> Result<TransportResponse, TransportError>;
}

/// Time source for the circuit breaker
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
