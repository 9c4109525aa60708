//! Activation record written after a number has been allocated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status stored for a freshly allocated activation
pub const ACTIVATION_STATUS_ACTIVE: &str = "active";

/// Denormalized view of an activation, kept in the cache for observability.
///
/// Nothing in the proxy reads it back; it is removed together with the SMS and
/// status entries when the activation is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRecord {
    /// Allocated phone number, when the provider returned one
    pub number: Option<String>,

    pub status: String,

    pub created_at: DateTime<Utc>,
}

impl ActivationRecord {
    /// Record for an activation that has just been allocated
    pub fn active(number: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            number,
            status: ACTIVATION_STATUS_ACTIVE.to_string(),
            created_at,
        }
    }
}
