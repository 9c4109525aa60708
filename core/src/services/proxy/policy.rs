//! Declarative per-operation cache policies

use std::fmt;

use sp_shared::config::CacheConfig;

use crate::domain::UpstreamResponse;

pub const ACTIVATION_PREFIX: &str = "activation";
pub const SMS_PREFIX: &str = "sms";
pub const STATUS_PREFIX: &str = "status";

/// Statuses after which an activation never changes again
pub const TERMINAL_STATUSES: [&str; 2] = [
    "SMS received. Activation finished",
    "SMS not received. Activation canceled",
];

/// How one cacheable operation is cached.
///
/// Responses are stored for `base_ttl` seconds, or for `promoted_ttl` when
/// `promote` says the answer is final.
#[derive(Clone, Copy)]
pub struct CachePolicy {
    pub prefix: &'static str,
    pub base_ttl: u64,
    pub promoted_ttl: u64,
    pub promote: fn(&UpstreamResponse) -> bool,
}

impl fmt::Debug for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePolicy")
            .field("prefix", &self.prefix)
            .field("base_ttl", &self.base_ttl)
            .field("promoted_ttl", &self.promoted_ttl)
            .finish_non_exhaustive()
    }
}

impl CachePolicy {
    /// SMS results: promoted once a code has arrived
    pub fn sms(base_ttl: u64, promoted_ttl: u64) -> Self {
        Self {
            prefix: SMS_PREFIX,
            base_ttl,
            promoted_ttl,
            promote: sms_received,
        }
    }

    /// Status results: promoted once the activation is finished or canceled
    pub fn status(base_ttl: u64, promoted_ttl: u64) -> Self {
        Self {
            prefix: STATUS_PREFIX,
            base_ttl,
            promoted_ttl,
            promote: status_is_terminal,
        }
    }

    /// Cache key; always scoped by token so activations never leak across tokens
    pub fn key(&self, token: &str, activation: &str) -> String {
        scoped_key(self.prefix, token, activation)
    }

    pub fn ttl_for(&self, response: &UpstreamResponse) -> u64 {
        if (self.promote)(response) {
            self.promoted_ttl
        } else {
            self.base_ttl
        }
    }
}

/// Every cache policy the proxy applies, plus the activation record lifetime
#[derive(Debug, Clone, Copy)]
pub struct CachePolicyTable {
    pub sms: CachePolicy,
    pub status: CachePolicy,
    pub activation_ttl: u64,
}

impl Default for CachePolicyTable {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for CachePolicyTable {
    fn from(config: &CacheConfig) -> Self {
        Self {
            sms: CachePolicy::sms(config.sms_ttl, config.sms_received_ttl),
            status: CachePolicy::status(config.status_ttl, config.status_terminal_ttl),
            activation_ttl: config.default_ttl,
        }
    }
}

impl CachePolicyTable {
    /// Keys holding state for one activation, all removed on cancellation
    pub fn activation_keys(&self, token: &str, activation: &str) -> [String; 3] {
        [
            activation_key(token, activation),
            self.sms.key(token, activation),
            self.status.key(token, activation),
        ]
    }
}

pub fn activation_key(token: &str, activation: &str) -> String {
    scoped_key(ACTIVATION_PREFIX, token, activation)
}

fn scoped_key(prefix: &str, token: &str, activation: &str) -> String {
    format!("{}:{}:{}", prefix, token, activation)
}

fn sms_received(response: &UpstreamResponse) -> bool {
    response.is_ok() && response.has_sms()
}

fn status_is_terminal(response: &UpstreamResponse) -> bool {
    response
        .status()
        .map(|status| TERMINAL_STATUSES.contains(&status))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResponseEnvelope;

    fn response(body: &str) -> UpstreamResponse {
        match UpstreamResponse::parse(body).unwrap() {
            ResponseEnvelope::Success(response) => response,
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_keys_are_scoped_by_operation_and_token() {
        let table = CachePolicyTable::default();
        let [activation, sms, status] = table.activation_keys("tok", "42");

        assert_eq!(activation, "activation:tok:42");
        assert_eq!(sms, "sms:tok:42");
        assert_eq!(status, "status:tok:42");
        assert_ne!(table.sms.key("tok", "42"), table.sms.key("other", "42"));
    }

    #[test]
    fn test_sms_policy_ttls() {
        let table = CachePolicyTable::default();
        assert_eq!(table.sms.ttl_for(&response(r#"{"code":"ok","sms":"1234"}"#)), 60);
        assert_eq!(table.sms.ttl_for(&response(r#"{"code":"ok","sms":""}"#)), 10);
        assert_eq!(table.sms.ttl_for(&response(r#"{"code":"wait","sms":"1234"}"#)), 10);
        assert_eq!(table.sms.ttl_for(&response(r#"{"code":"ok"}"#)), 10);
    }

    #[test]
    fn test_status_policy_ttls() {
        let table = CachePolicyTable::default();
        for terminal in TERMINAL_STATUSES {
            let body = format!(r#"{{"code":"ok","status":"{}"}}"#, terminal);
            assert_eq!(table.status.ttl_for(&response(&body)), 3600);
        }
        assert_eq!(
            table.status.ttl_for(&response(r#"{"code":"ok","status":"waiting"}"#)),
            15
        );
    }

    #[test]
    fn test_table_follows_config() {
        let config = CacheConfig {
            default_ttl: 120,
            sms_ttl: 5,
            sms_received_ttl: 30,
            status_ttl: 7,
            status_terminal_ttl: 900,
        };
        let table = CachePolicyTable::from(&config);

        assert_eq!(table.activation_ttl, 120);
        assert_eq!((table.sms.base_ttl, table.sms.promoted_ttl), (5, 30));
        assert_eq!((table.status.base_ttl, table.status.promoted_ttl), (7, 900));
    }
}
