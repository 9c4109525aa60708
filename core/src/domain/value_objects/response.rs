//! Parsed upstream responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message used when an error envelope carries no message of its own
pub const DEFAULT_UPSTREAM_ERROR: &str = "Unknown error";

const ERROR_CODE: &str = "error";
const OK_CODE: &str = "ok";

/// Successful upstream payload.
///
/// Serializes to exactly the JSON object the provider returned, so it can be
/// cached and handed back to clients unchanged. An error envelope is never
/// represented by this type; see [`ResponseEnvelope`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpstreamResponse {
    payload: Map<String, Value>,
}

/// Result of parsing an upstream body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    Success(UpstreamResponse),
    Error { message: String },
}

impl UpstreamResponse {
    /// Parse a response body. Anything other than a JSON object is rejected.
    pub fn parse(body: &str) -> Result<ResponseEnvelope, serde_json::Error> {
        let payload: Map<String, Value> = serde_json::from_str(body)?;

        if payload.get("code").and_then(Value::as_str) == Some(ERROR_CODE) {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_UPSTREAM_ERROR)
                .to_string();
            return Ok(ResponseEnvelope::Error { message });
        }

        Ok(ResponseEnvelope::Success(Self { payload }))
    }

    pub fn code(&self) -> Option<&str> {
        self.payload.get("code").and_then(Value::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.code() == Some(OK_CODE)
    }

    pub fn status(&self) -> Option<&str> {
        self.payload.get("status").and_then(Value::as_str)
    }

    /// Activation id; the provider sends it either as a string or a number
    pub fn activation(&self) -> Option<String> {
        scalar_to_string(self.payload.get("activation")?)
    }

    pub fn number(&self) -> Option<String> {
        scalar_to_string(self.payload.get("number")?)
    }

    /// True when an SMS code is present and non-empty
    pub fn has_sms(&self) -> bool {
        match self.payload.get("sms") {
            None | Some(Value::Null) => false,
            Some(Value::String(sms)) => !sms.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(fields)) => !fields.is_empty(),
            Some(_) => true,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
