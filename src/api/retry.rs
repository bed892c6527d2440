//! Retry strategy: which responses are worth repeating, and how long to wait.
//!
//! Both pieces are plain functions so tests can drive them without a
//! server. The request loop in [`crate::api::client`] is their only caller.

use std::time::Duration;

use crate::config::ApiConfig;

/// Retry decision for a single failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    Retry,
    Abort,
}

/// Broad classification of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// 429 and 5xx: worth another attempt after a pause.
    Transient,
    /// Every other non-success status: bad token, scope or id.
    Permanent,
}

/// Classify a response status.
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        429 | 500..=599 => StatusClass::Transient,
        _ => StatusClass::Permanent,
    }
}

/// Whether a response with this status should be retried.
pub fn should_retry_for_status(status: u16) -> RetryAction {
    match classify_status(status) {
        StatusClass::Transient => RetryAction::Retry,
        _ => RetryAction::Abort,
    }
}

/// Exponential backoff without jitter.
///
/// `delay = min(base_delay * 2^(retry - 1), max_delay)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, initial request included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(32),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Policy for JSON API calls.
    pub fn for_api(config: &ApiConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.backoff_base_ms),
            Duration::from_millis(config.backoff_max_ms),
        )
    }

    /// Policy for binary downloads.
    pub fn for_downloads(config: &ApiConfig) -> Self {
        Self::new(
            config.download_attempts,
            Duration::from_millis(config.backoff_base_ms),
            Duration::from_millis(config.backoff_max_ms),
        )
    }

    /// Delay to wait after failed attempt `attempt` (1-indexed) before the
    /// next one.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1);
        let factor = 1u32.checked_shl(shift).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempt` failed.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(classify_status(200), StatusClass::Success);
        assert_eq!(classify_status(429), StatusClass::Transient);
        assert_eq!(classify_status(500), StatusClass::Transient);
        assert_eq!(classify_status(503), StatusClass::Transient);
        assert_eq!(classify_status(400), StatusClass::Permanent);
        assert_eq!(classify_status(401), StatusClass::Permanent);
        assert_eq!(classify_status(404), StatusClass::Permanent);
    }

    #[test]
    fn test_should_retry_only_transient() {
        assert_eq!(should_retry_for_status(429), RetryAction::Retry);
        assert_eq!(should_retry_for_status(502), RetryAction::Retry);
        assert_eq!(should_retry_for_status(403), RetryAction::Abort);
        assert_eq!(should_retry_for_status(200), RetryAction::Abort);
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100), Duration::from_secs(60));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_strictly_increasing_below_cap() {
        let policy = RetryPolicy::default();
        for attempt in 1..policy.max_attempts {
            assert!(policy.delay_for_attempt(attempt + 1) > policy.delay_for_attempt(attempt));
        }
    }

    #[test]
    fn test_delay_capped_at_max() {
        let policy = RetryPolicy::new(40, Duration::from_secs(1), Duration::from_secs(32));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(32));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(32));
    }

    #[test]
    fn test_attempt_budget() {
        let policy = RetryPolicy::new(3, Duration::ZERO, Duration::ZERO);
        assert!(policy.has_attempts_left(1));
        assert!(policy.has_attempts_left(2));
        assert!(!policy.has_attempts_left(3));
        assert_eq!(RetryPolicy::new(0, Duration::ZERO, Duration::ZERO).max_attempts, 1);
    }
}
