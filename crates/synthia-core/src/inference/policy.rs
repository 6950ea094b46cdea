//! Retry decisions for models that are still warming up.
//!
//! Only the warming-up status is retried. Every other non-200 status fails on
//! first sight, including 5xx and 429.

use std::time::Duration;

use crate::config::RetryConfig;

/// The only status accepted as success.
pub const STATUS_OK: u16 = 200;

/// Status the inference service returns while a model is loading.
pub const STATUS_WARMING_UP: u16 = 503;

/// What to do after receiving a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Hand the response to the validator.
    Succeed,
    /// Wait, then send the same request again.
    RetryAfter(Duration),
    /// Stop here.
    FailPermanently,
}

/// Fixed-delay, bounded-attempt retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first), at least 1.
    max_attempts: u32,
    /// Fixed delay between attempts.
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(30))
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_secs(config.delay_seconds))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Decide for `status` seen on `attempt` (1-based) against this policy's bound.
    pub fn decide(&self, status: u16, attempt: u32) -> RetryDecision {
        decide(status, attempt, self.max_attempts, self.delay)
    }
}

/// Pure decision table.
pub fn decide(status: u16, attempt: u32, max_attempts: u32, delay: Duration) -> RetryDecision {
    match status {
        STATUS_OK => RetryDecision::Succeed,
        STATUS_WARMING_UP if attempt < max_attempts => RetryDecision::RetryAfter(delay),
        _ => RetryDecision::FailPermanently,
    }
}
