//! Upstream provider configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, env_string};

const DEFAULT_BASE_URL: &str = "https://postback-sms.com/api/";

/// Upstream HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Provider endpoint; every action is a GET against this URL
    pub base_url: String,

    /// Total request timeout in seconds
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds
    pub retry_base_delay_ms: u64,

    /// Idle time in seconds before TCP keep-alive packets are sent
    pub keepalive_idle_secs: u64,

    /// Idle pooled connections are dropped after this many seconds
    pub pool_idle_secs: u64,

    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            keepalive_idle_secs: 120,
            pool_idle_secs: 90,
            user_agent: default_user_agent(),
        }
    }
}

impl UpstreamConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_string("SMS_API_BASE_URL", &defaults.base_url),
            timeout_secs: env_or("SMS_API_TIMEOUT", defaults.timeout_secs),
            connect_timeout_secs: env_or("SMS_API_CONNECT_TIMEOUT", defaults.connect_timeout_secs),
            max_retries: env_or("SMS_API_MAX_RETRIES", defaults.max_retries),
            retry_base_delay_ms: env_or("SMS_API_RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms),
            keepalive_idle_secs: env_or("SMS_API_KEEPALIVE_IDLE", defaults.keepalive_idle_secs),
            pool_idle_secs: env_or("SMS_API_POOL_IDLE_TIMEOUT", defaults.pool_idle_secs),
            user_agent: env_string("SMS_API_USER_AGENT", &defaults.user_agent),
        }
    }
}

fn default_user_agent() -> String {
    format!("sms-proxy/{}", env!("CARGO_PKG_VERSION"))
}
