//! Capped exponential backoff for chat submissions.
//!
//! Attempts are 1-based. The delay before attempt `n` (n >= 2) is
//! `min(base * 2^(n-2), max)`; with the defaults that is 1s, 2s, 4s, ...
//! capped at 10s.

use std::time::Duration;

use healthsync_types::config::ChatConfig;
use healthsync_types::error::AppError;

/// Retry schedule for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Delay to wait before `attempt`. Zero for the first attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt < 2 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Whether a failure on `attempt` should be followed by another attempt.
    pub fn should_retry(&self, attempt: u32, error: &AppError) -> bool {
        error.retryable && attempt < self.max_attempts
    }

    /// Delays before attempts 2..=max_attempts.
    pub fn schedule(&self) -> Vec<Duration> {
        (2..=self.max_attempts).map(|a| self.delay_before(a)).collect()
    }
}
