//! Retry with exponential backoff and jitter for transient HTTP failures.
//!
//! Delay before retry `n` (1-based) is `min(base * 2^(n-1) + jitter, max)`
//! with `jitter` drawn uniformly from `[0, base)`. A `Retry-After` hint on a
//! 429 replaces the computed delay, capped at `max_retry_after`.

use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

/// Configuration for retry behavior on transient errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Delay before the first retry, and the jitter range.
    pub base_delay: Duration,
    /// Maximum computed delay between retries.
    pub max_delay: Duration,
    /// Upper bound on a server-provided `Retry-After`.
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            max_retry_after: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt `attempt` (1-based) before the next one.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, err: &TransportError) -> Duration {
        if let TransportError::RateLimited {
            retry_after_secs: Some(secs),
        } = err
        {
            return Duration::from_secs(*secs).min(self.max_retry_after);
        }

        let exponent = attempt.saturating_sub(1).min(16);
        let backoff = self.base_delay.saturating_mul(1 << exponent);
        (backoff + jitter(self.base_delay)).min(self.max_delay)
    }
}

/// Uniform random duration in `[0, range)`; zero if randomness is unavailable.
fn jitter(range: Duration) -> Duration {
    let range_ms = u64::try_from(range.as_millis()).unwrap_or(u64::MAX);
    if range_ms == 0 {
        return Duration::ZERO;
    }
    getrandom::u64().map_or(Duration::ZERO, |r| Duration::from_millis(r % range_ms))
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// Non-retryable errors are returned as-is after a single attempt. When every
/// attempt fails transiently the last error is wrapped in
/// [`TransportError::Exhausted`].
///
/// # Errors
///
/// Returns the first non-retryable error, or `Exhausted`.
pub async fn run<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() => {
                if attempt >= max_attempts {
                    tracing::warn!(operation, attempts = attempt, error = %err, "giving up");
                    return Err(TransportError::Exhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                let delay = policy.delay_for(attempt, &err);
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
