//! Unit tests for the proxy error taxonomy

use sp_shared::errors::IntoErrorResponse;

use crate::errors::{ErrorKind, ProxyError, TransportError, TransportErrorKind};

#[test]
fn test_status_hints() {
    assert_eq!(ProxyError::validation("token", "Invalid token format").status_hint(), 400);
    assert_eq!(ProxyError::upstream("NO_NUMBERS").status_hint(), 400);
    assert_eq!(ProxyError::UpstreamUnavailable.status_hint(), 503);
    assert_eq!(
        ProxyError::Transport { message: "connection reset".to_string() }.status_hint(),
        503
    );
    assert_eq!(ProxyError::Cancelled.status_hint(), 499);
}

#[test]
fn test_transient_classification() {
    assert!(ProxyError::UpstreamUnavailable.is_transient());
    assert!(ProxyError::Transport { message: "timeout".to_string() }.is_transient());
    assert!(ProxyError::Cancelled.is_transient());
    assert!(!ProxyError::upstream("Wrong token").is_transient());
    assert!(!ProxyError::validation("country", "Country must be 2 characters").is_transient());
}

#[test]
fn test_circuit_open_message() {
    let err = ProxyError::UpstreamUnavailable;
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(
        err.to_string(),
        "Service temporarily unavailable. Circuit breaker is open."
    );
}

#[test]
fn test_upstream_message_is_passed_through() {
    let err = ProxyError::Upstream {
        message: "API returned status code: 502".to_string(),
        status: Some(502),
    };
    let response = err.to_error_response();
    assert_eq!(response.code, "error");
    assert_eq!(response.message, "API returned status code: 502");
}

#[test]
fn test_transport_error_conversion() {
    let transport = TransportError::timeout("operation timed out");
    assert_eq!(transport.kind, TransportErrorKind::Timeout);

    let err: ProxyError = transport.into();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.to_string(), "Request failed: operation timed out");
}
