//! Exponential backoff retry policy

use std::time::Duration;

use crate::errors::TransportError;

use super::traits::TransportResponse;

/// Retry policy for upstream calls.
///
/// Transport failures are always retried, HTTP responses only on 5xx. The
/// delay before retry `n` (1-indexed) is `base_delay * 2^(n-1)`, without jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry `retry_number`, where the first retry is 1
    pub fn delay_for(&self, retry_number: u32) -> Duration {
        let exponent = retry_number.saturating_sub(1);
        let factor = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Whether an attempt outcome is worth retrying
    pub fn should_retry(&self, outcome: &Result<TransportResponse, TransportError>) -> bool {
        match outcome {
            Err(_) => true,
            Ok(response) => response.status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::new(100, Duration::from_millis(1000));
        assert!(policy.delay_for(64) >= policy.delay_for(32));
    }

    #[test]
    fn test_should_retry_classification() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&Err(TransportError::connect("connection refused"))));
        assert!(policy.should_retry(&Ok(TransportResponse::new(500, ""))));
        assert!(policy.should_retry(&Ok(TransportResponse::new(503, ""))));
        assert!(!policy.should_retry(&Ok(TransportResponse::new(404, ""))));
        assert!(!policy.should_retry(&Ok(TransportResponse::new(429, ""))));
        assert!(!policy.should_retry(&Ok(TransportResponse::new(200, "{}"))));
    }
}
