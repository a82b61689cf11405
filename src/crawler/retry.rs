//! Retry policy for failed lookups
//!
//! Backoff is linear: the delay before attempt `n` is `base_delay * n`. There
//! is no jitter. Attempt numbering starts at 1, so a policy allowing
//! `max_retries` retries performs at most `max_retries + 1` attempts.
//!
//! | Attempt that just failed | Retry? (`max_retries = 3`) | Sleep before next |
//! |--------------------------|----------------------------|-------------------|
//! | 1 | yes | 2 × base |
//! | 2 | yes | 3 × base |
//! | 3 | yes | 4 × base |
//! | 4 | no  | none |

use crate::config::RetryConfig;
use std::time::Duration;

/// Decides whether a failed attempt is retried and how long to wait first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Builds the policy from the retry section of the configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.base_delay())
    }

    /// Returns true iff `attempt_number <= max_retries`
    pub fn should_retry(&self, attempt_number: u32) -> bool {
        attempt_number <= self.max_retries
    }

    /// Returns `base_delay * attempt_number`
    ///
    /// The caller passes the number of the attempt about to be made, so the
    /// sleeps between successive attempts grow strictly.
    pub fn backoff_delay(&self, attempt_number: u32) -> Duration {
        self.base_delay
            .checked_mul(attempt_number)
            .unwrap_or(Duration::MAX)
    }

    /// Total number of attempts this policy allows
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }
}
