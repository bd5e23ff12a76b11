//! Retry with exponential backoff, bounded by elapsed time.
//!
//! The booking service is rate sensitive and drops requests under load, so
//! transient failures are retried with a doubling delay. There is no attempt
//! limit: the loop stops once the elapsed time reaches the policy's budget.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::error::QueryError;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry (default: 50ms).
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each failure (default: 2.0).
    pub backoff_factor: f64,
    /// Upper bound on a single delay (default: 10s).
    pub max_delay: Duration,
    /// Total time after which retrying stops (default: 90s).
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(50),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(10),
            max_elapsed: Duration::from_secs(90),
        }
    }
}

impl RetryPolicy {
    /// Set the delay before the first retry.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the cap on a single delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the total retry budget.
    pub fn with_max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = budget;
        self
    }

    /// Delay before retry number `attempt` (0-indexed), ignoring the budget.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let initial_ms = self.initial_delay.as_millis().min(u64::MAX as u128) as u64;
        let max_ms = self.max_delay.as_millis().min(u64::MAX as u128) as u64;

        let exp = attempt.min(31) as i32;
        let delay_ms = (initial_ms as f64) * self.backoff_factor.max(1.0).powi(exp);
        Duration::from_millis(delay_ms.min(max_ms as f64) as u64)
    }
}

/// Run `operation` until it succeeds, fails with a non-transient error, or
/// the policy's elapsed-time budget is used up.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, QueryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, QueryError>>,
{
    let start = Instant::now();
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "query succeeded after retries");
                }
                return Ok(value);
            }
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => e,
        };

        attempt += 1;
        let elapsed = start.elapsed();
        if elapsed >= policy.max_elapsed {
            warn!(
                attempts = attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %err,
                "giving up after retry budget"
            );
            return Err(QueryError::RetryBudgetExceeded {
                elapsed,
                attempts: attempt,
                last: Box::new(err),
            });
        }

        let remaining = policy.max_elapsed - elapsed;
        let delay = policy.delay_for_attempt(attempt - 1).min(remaining);
        debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "retrying query after failure"
        );
        tokio::time::sleep(delay).await;
    }
}
