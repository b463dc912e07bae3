//! Exponential backoff for retryable provider failures.

use super::CallContext;
use crate::provider::domain::{ProviderResult, RetryPolicy};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound of the random jitter, as a fraction of the delay.
const MAX_JITTER: f64 = 0.25;

/// Returns the delay before retry number `attempt` (zero-based).
///
/// The delay is `initial × multiplier^attempt`, plus up to 25% jitter when
/// enabled, capped at the policy maximum.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "backoff growth and jitter are fractional by definition"
)]
pub fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let seconds = policy.initial_delay().as_secs_f64() * policy.backoff_multiplier.powi(exponent);
    let base = Duration::try_from_secs_f64(seconds)
        .unwrap_or_else(|_| policy.max_delay())
        .min(policy.max_delay());
    let delay = if policy.jitter {
        let factor = rand::rng().random_range(0.0..=MAX_JITTER);
        base.mul_f64(1.0 + factor)
    } else {
        base
    };
    delay.min(policy.max_delay())
}

/// Runs `attempt` until it succeeds, fails with a non-retryable kind, or the
/// retry budget is spent.
///
/// A `retry_after_secs` context entry on the error stretches the next delay,
/// still capped at the policy maximum. Sleeps between attempts honour the
/// context.
///
/// # Errors
///
/// Returns the last attempt's error, or an `internal` error when the context
/// is interrupted while waiting.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    ctx: &CallContext,
    operation: &str,
    mut attempt: F,
) -> ProviderResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    let mut retries: u32 = 0;
    loop {
        match attempt().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(operation, retries, "request succeeded after retrying");
                }
                return Ok(value);
            }
            Err(error) if !error.is_retryable() => return Err(error),
            Err(error) if retries >= policy.max_retries => {
                warn!(operation, retries, error = %error, "retries exhausted");
                return Err(error.with_context("attempts", retries.saturating_add(1)));
            }
            Err(error) => {
                let requested = error
                    .context_value("retry_after_secs")
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or_default();
                let delay = backoff_delay(policy, retries)
                    .max(requested)
                    .min(policy.max_delay());
                warn!(
                    operation,
                    attempt = retries.saturating_add(1),
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "retrying after failure"
                );
                ctx.run(operation, async {
                    tokio::time::sleep(delay).await;
                    Ok(())
                })
                .await?;
                retries = retries.saturating_add(1);
            }
        }
    }
}
