//! Error payload shared by every API endpoint

use serde::{Deserialize, Serialize};

/// Marker placed in the `code` field of every error payload
pub const ERROR_CODE: &str = "error";

/// Error envelope returned to clients.
///
/// The shape matches the upstream provider's own error envelope, so callers
/// handle proxy-generated and upstream-generated failures the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `"error"`
    pub code: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: ERROR_CODE.to_string(),
            message: message.into(),
        }
    }
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}
