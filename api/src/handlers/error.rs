//! Error-to-HTTP mapping
//!
//! Every failure leaving the API is rendered as the shared
//! `{"code":"error","message":"..."}` payload.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use sp_core::errors::ProxyError;
use sp_shared::errors::{ErrorResponse, IntoErrorResponse};

pub const INVALID_ACTION_MESSAGE: &str = "Invalid action parameter";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";

/// Errors returned by API handlers and middleware
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unknown `action` query parameter
    #[error("Invalid action parameter")]
    InvalidAction,

    /// Request parameters failed validation
    #[error("{0}")]
    Validation(String),

    #[error("Too many requests. Please try again later.")]
    RateLimited,

    /// Failure raised by a proxy operation
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidAction | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Proxy(error) => {
                StatusCode::from_u16(error.status_hint()).unwrap_or(StatusCode::BAD_REQUEST)
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_error_response())
    }
}

impl IntoErrorResponse for ApiError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::Proxy(error) => error.to_error_response(),
            other => ErrorResponse::new(other.to_string()),
        }
    }
}
