//! Error types for the proxy core and its collaborators.

use sp_shared::errors::{ErrorResponse, IntoErrorResponse};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Message returned while the circuit breaker rejects calls
pub const CIRCUIT_OPEN_MESSAGE: &str = "Service temporarily unavailable. Circuit breaker is open.";

/// Errors surfaced by the proxy operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Malformed caller input, raised by the boundary layer
    #[error("{message}")]
    Validation { field: String, message: String },

    /// Circuit is open; no network attempt was made
    #[error("Service temporarily unavailable. Circuit breaker is open.")]
    UpstreamUnavailable,

    /// Network-level failure after all retries were exhausted
    #[error("Request failed: {message}")]
    Transport { message: String },

    /// Upstream answered with a non-200 status, an unparsable body or an error envelope
    #[error("{message}")]
    Upstream { message: String, status: Option<u16> },

    /// Caller abandoned the request before it completed
    #[error("Request cancelled")]
    Cancelled,
}

/// Coarse classification used by the boundary layer to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unavailable,
    Transport,
    Upstream,
    Cancelled,
}

impl ProxyError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ProxyError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ProxyError::Upstream {
            message: message.into(),
            status: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::Validation { .. } => ErrorKind::Validation,
            ProxyError::UpstreamUnavailable => ErrorKind::Unavailable,
            ProxyError::Transport { .. } => ErrorKind::Transport,
            ProxyError::Upstream { .. } => ErrorKind::Upstream,
            ProxyError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Unavailable | ErrorKind::Transport | ErrorKind::Cancelled
        )
    }

    /// HTTP status the boundary layer should answer with
    pub fn status_hint(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Upstream => 400,
            ErrorKind::Unavailable | ErrorKind::Transport => 503,
            ErrorKind::Cancelled => 499,
        }
    }
}

impl From<TransportError> for ProxyError {
    fn from(err: TransportError) -> Self {
        ProxyError::Transport {
            message: err.message,
        }
    }
}

impl IntoErrorResponse for ProxyError {
    fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.to_string())
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;

/// Failures reported by a `CacheStore` implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache operation failed: {0}")]
    Operation(String),

    #[error("Cache value could not be encoded: {0}")]
    Serialization(String),
}

/// Category of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

/// Failure reported by an `HttpTransport` before any HTTP response was read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }
}
