//! # LLM retry
//!
//! Two primitives used to wrap remote LLM calls, keeping retry policy out of call sites:
//!
//! - [`with_timeout`]: race a future against a timer
//! - [`with_retry`]: re-run an async unit of work with linear backoff
//!
//! Errors are mechanical (no user-facing copy); callers decide how to present them.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// The timer fired before the wrapped future settled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("LLM request timeout")]
pub struct TimeoutError {
    pub after: Duration,
}

/// Races `future` against a `timeout` timer.
///
/// Whichever branch settles first wins and the other is dropped: the timer never outlives
/// the call, and on timeout the inner future is dropped rather than left running.
pub async fn with_timeout<F>(future: F, timeout: Duration) -> Result<F::Output, TimeoutError>
where
    F: Future,
{
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| TimeoutError { after: timeout })
}

/// Retry budget and predicate for [`with_retry`].
#[derive(Debug, Clone)]
pub struct RetryOptions<P> {
    /// Extra attempts after the first; total attempts = `retries + 1`.
    pub retries: u32,
    /// Delay before retry `n` (0-based failed attempt index) is `base_delay * (n + 1)`.
    pub base_delay: Duration,
    pub should_retry: P,
}

/// Delay slept after failed attempt `attempt` (0-based).
pub fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    base_delay.saturating_mul(attempt.saturating_add(1))
}

/// Runs `f(attempt)` until it succeeds, the budget is spent or `should_retry` refuses.
///
/// `should_retry` is consulted on every failure, including the last one, but budget
/// exhaustion always wins. The last error is returned unchanged.
pub async fn with_retry<F, Fut, T, E, P>(mut f: F, options: RetryOptions<P>) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt: u32 = 0;
    loop {
        match f(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt, "retry succeeded");
                }
                return Ok(value);
            }
            Err(e) => {
                let approved = (options.should_retry)(&e);
                let has_budget = attempt < options.retries;
                if !(approved && has_budget) {
                    warn!(
                        attempt,
                        retries = options.retries,
                        retryable = approved,
                        error = %e,
                        "giving up"
                    );
                    return Err(e);
                }
                let delay = backoff_delay(options.base_delay, attempt);
                warn!(
                    attempt,
                    retries = options.retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
