//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Per-action request limits, counted per client IP over a fixed window
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub get_number: u32,
    pub get_sms: u32,
    pub cancel_number: u32,
    pub get_status: u32,

    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            get_number: 100,
            get_sms: 200,
            cancel_number: 50,
            get_status: 300,
            window_secs: 60,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("SMS_RATE_LIMIT_ENABLED", defaults.enabled),
            get_number: env_or("SMS_RATE_LIMIT_GET_NUMBER", defaults.get_number),
            get_sms: env_or("SMS_RATE_LIMIT_GET_SMS", defaults.get_sms),
            cancel_number: env_or("SMS_RATE_LIMIT_CANCEL_NUMBER", defaults.cancel_number),
            get_status: env_or("SMS_RATE_LIMIT_GET_STATUS", defaults.get_status),
            window_secs: env_or("SMS_RATE_LIMIT_WINDOW", defaults.window_secs),
        }
    }

    /// Limit for an upstream action name, `None` for unknown actions
    pub fn limit_for(&self, action: &str) -> Option<u32> {
        match action {
            "getNumber" => Some(self.get_number),
            "getSms" => Some(self.get_sms),
            "cancelNumber" => Some(self.cancel_number),
            "getStatus" => Some(self.get_status),
            _ => None,
        }
    }
}
