// Bounded exponential backoff for idempotent requests.

use std::time::Duration;

use crate::error::Error;

/// Retry bound and base delay.
///
/// `max_retries = 0` disables retrying entirely, which is the default.
/// Attempt `n` (1-based) waits `base_delay * 2^(n-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
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

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether a failure after `retries_so_far` retries earns another attempt.
    pub fn should_retry(&self, retries_so_far: u32, error: &Error) -> bool {
        retries_so_far < self.max_retries && error.is_retryable()
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}
