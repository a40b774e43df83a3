//! Retry with exponential backoff for asynchronous operations.
//!
//! [`RetryPolicy`] wraps an arbitrary fallible async operation and retries it
//! on transient failures. Errors are classified via
//! [`ApiError::retry_class`]; non-retryable errors propagate immediately.
//! Backoff is pure exponential (no jitter): the delay starts at
//! `initial_delay`, doubles after every failed attempt, and is capped at
//! `max_delay`.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::errors::{ApiError, RetryClass};

/// Default number of attempts (first try included).
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Default backoff ceiling.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(8);

/// Retry-with-backoff wrapper around an arbitrary async unit of work.
///
/// A single instance is cheap to share and safe to reuse across many
/// independent call sites: `execute` takes `&self` and keeps all per-call
/// state on the stack.
///
/// # Guarantees
///
/// - The operation is invoked at most `max_attempts` times.
/// - No backoff sleep happens after the final attempt.
/// - A non-retryable error propagates without further attempts.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Create a retry policy.
    ///
    /// `max_attempts` counts the initial try; it is clamped to at least 1.
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay,
        }
    }

    /// Standard policy: 3 attempts, 1s initial delay, 8s ceiling.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY)
    }

    /// Aggressive policy for operations worth hammering: 5 attempts,
    /// 500ms initial delay, 5s ceiling.
    pub fn aggressive() -> Self {
        Self::new(5, Duration::from_millis(500), Duration::from_secs(5))
    }

    /// Conservative policy for expensive operations: 2 attempts,
    /// 2s initial delay, 10s ceiling.
    pub fn conservative() -> Self {
        Self::new(2, Duration::from_secs(2), Duration::from_secs(10))
    }

    /// Run `operation`, retrying transient failures with exponential backoff.
    ///
    /// `operation` is called to produce a fresh future for every attempt.
    /// Returns the first success, the first non-retryable error, or the last
    /// observed error once attempts are exhausted.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut current_delay = self.initial_delay;
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if err.retry_class() != RetryClass::WithBackoff || attempt >= self.max_attempts
                    {
                        return Err(err);
                    }

                    let delay = current_delay.min(self.max_delay);
                    debug!(
                        "attempt {}/{} failed ({}), retrying in {:?}",
                        attempt, self.max_attempts, err, delay
                    );
                    tokio::time::sleep(delay).await;

                    current_delay *= 2;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_defaults()
    }
}
