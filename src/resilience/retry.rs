//! Retry policy.
//!
//! # Responsibilities
//! - Decide whether a failed attempt should be tried again
//! - Compute how long to wait before the next attempt
//! - Enforce the attempt budget
//!
//! # Design Decisions
//! - The policy is pure: `(attempt, error) -> Option<Duration>`; all
//!   bookkeeping lives in the dispatch loop
//! - Connection errors are always retryable, configured transient
//!   statuses (default 502/503/504) are retryable, 4xx never is
//!   (a malformed request does not become well-formed by resending it)

use std::time::Duration;

use crate::config::schema::RetryConfig;
use crate::error::Error;
use crate::resilience::backoff::backoff_delay;

/// Pluggable retry policy. A request carrying its own retrier overrides
/// the client default for that call only.
pub trait Retrier: Send + Sync {
    /// Decide whether the attempt that failed with `error` should be
    /// retried, and how long to wait first. `attempt` is 1-based and
    /// counts the attempt that just failed.
    fn retry(&self, attempt: u32, error: &Error) -> Option<Duration>;
}

/// Default policy: bounded attempts, exponential backoff with jitter,
/// retries on connection errors and a configurable transient status set.
#[derive(Debug, Clone)]
pub struct BackoffRetrier {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub transient_statuses: Vec<u16>,
}

impl Default for BackoffRetrier {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl BackoffRetrier {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: if config.enabled { config.max_attempts } else { 1 },
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            transient_statuses: config.transient_statuses.clone(),
        }
    }

    fn is_retryable(&self, error: &Error) -> bool {
        match error {
            Error::Connection { .. } => true,
            Error::Server { status, .. } => self.transient_statuses.contains(status),
            _ => false,
        }
    }
}

impl Retrier for BackoffRetrier {
    fn retry(&self, attempt: u32, error: &Error) -> Option<Duration> {
        if attempt >= self.max_attempts || !self.is_retryable(error) {
            return None;
        }
        Some(backoff_delay(attempt, self.base_delay, self.max_delay))
    }
}
