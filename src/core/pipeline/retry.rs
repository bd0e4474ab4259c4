//! Bounded retry with multiplicative backoff
//!
//! Applied only around the semantic classifier call. Only retryable
//! failures (rate limits and bounded-wait timeouts) are re-issued; all
//! other errors propagate on the first attempt.

use crate::domain::ClassifierError;
use std::future::Future;
use std::time::Duration;

/// Retry policy for one classifier call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Each subsequent delay is multiplied by this factor
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, backoff_multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            backoff_multiplier,
        }
    }
}

/// Run `operation` under the policy, sleeping between retryable failures.
///
/// `cancelled` is polled before every sleep; once it reports true the
/// current error is returned without further attempts.
pub async fn retry_classifier<T, F, Fut>(
    policy: &RetryPolicy,
    mut cancelled: impl FnMut() -> bool,
    mut operation: F,
) -> std::result::Result<T, ClassifierError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, ClassifierError>>,
{
    let mut delay = policy.initial_delay;

    for attempt in 1..=policy.max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts && !cancelled() => {
                tracing::warn!(
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying classifier call after rate-limit signal"
                );
                tokio::time::sleep(delay).await;
                delay = delay.mul_f64(policy.backoff_multiplier);
            }
            Err(e) => return Err(e),
        }
    }

    // max_attempts is clamped to >= 1, so the loop always returns first
    unreachable!("retry loop exited without a result")
}
