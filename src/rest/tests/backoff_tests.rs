//! Tests for backoff delays and the retry loop.

use crate::provider::domain::{ErrorKind, ProviderError, ProviderResult, RetryPolicy};
use crate::rest::{CallContext, backoff_delay, with_retry};
use rstest::{fixture, rstest};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[fixture]
fn policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        initial_delay_ms: 10,
        max_delay_ms: 35,
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

#[rstest]
#[case(0, 10)]
#[case(1, 20)]
#[case(2, 35)]
#[case(30, 35)]
fn backoff_grows_geometrically_up_to_the_cap(
    policy: RetryPolicy,
    #[case] attempt: u32,
    #[case] expected_ms: u64,
) {
    assert_eq!(
        backoff_delay(&policy, attempt),
        Duration::from_millis(expected_ms)
    );
}

#[rstest]
fn jitter_adds_at_most_a_quarter() {
    let policy = RetryPolicy {
        initial_delay_ms: 100,
        max_delay_ms: 1_000,
        jitter: true,
        ..RetryPolicy::default()
    };

    for _ in 0..50 {
        let delay = backoff_delay(&policy, 0);
        assert!(delay >= Duration::from_millis(100));
        assert!(delay <= Duration::from_millis(125));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retryable_failures_are_retried_until_the_budget_is_spent(policy: RetryPolicy) {
    let calls = AtomicU32::new(0);
    let ctx = CallContext::new();

    let result: ProviderResult<()> = with_retry(&policy, &ctx, "probe", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::network("connection reset"))
    })
    .await;

    let error = result.expect_err("network failures exhaust retries");
    assert_eq!(error.kind(), ErrorKind::Network);
    assert_eq!(error.context_value("attempts"), Some("3"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_retryable_failures_fail_immediately(policy: RetryPolicy) {
    let calls = AtomicU32::new(0);
    let ctx = CallContext::new();

    let result: ProviderResult<()> = with_retry(&policy, &ctx, "lookup", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::not_found("no such issue"))
    })
    .await;

    assert!(result.expect_err("not found surfaces").is_not_found());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_recovers_after_transient_failure(policy: RetryPolicy) {
    let calls = AtomicU32::new(0);
    let ctx = CallContext::new();

    let result = with_retry(&policy, &ctx, "list", || async {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(ProviderError::new(ErrorKind::RateLimit, "slow down"))
        } else {
            Ok(7)
        }
    })
    .await;

    assert_eq!(result.expect("second attempt succeeds"), 7);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retry_sleep_honours_the_deadline() {
    let slow = RetryPolicy {
        max_retries: 5,
        initial_delay_ms: 5_000,
        max_delay_ms: 5_000,
        backoff_multiplier: 1.0,
        jitter: false,
    };
    let ctx = CallContext::with_timeout(Duration::from_millis(50));

    let result: ProviderResult<()> = with_retry(&slow, &ctx, "list", || async {
        Err(ProviderError::network("unreachable"))
    })
    .await;

    let error = result.expect_err("deadline interrupts backoff");
    assert_eq!(error.kind(), ErrorKind::Internal);
}
