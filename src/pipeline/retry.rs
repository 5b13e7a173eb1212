//! Bounded retry with exponential backoff for remote service calls
//!
//! Only transient failures (rate limits, outages) are retried; local failures
//! and rejected input surface immediately.

use std::future::Future;
use std::time::Duration;

use crate::config::RetrySettings;
use crate::Result;

/// Retry policy derived from configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }
}

/// Run `op`, retrying transient failures with doubling delays up to the
/// policy's attempt budget. The final error is returned unchanged.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = policy.base_delay;
    // A policy built by hand may carry max_attempts = 0; every call still
    // gets one attempt.
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    label,
                    attempt,
                    max_attempts,
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(policy.max_delay);
            }
            Err(err) => return Err(err),
        }
    }

    unreachable!("retry loop always returns on the last attempt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GavelError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn transient_failure_is_retried_until_success() {
        let calls = AtomicUsize::new(0);

        let result = with_retry(&fast_policy(5), "test", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(GavelError::RateLimited("slow down".to_string()))
            } else {
                Ok("done")
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_failure_is_not_retried() {
        let calls = AtomicUsize::new(0);

        let err = with_retry(&fast_policy(5), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(GavelError::InvalidInput("bad audio".to_string()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, GavelError::InvalidInput(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempt_policy_still_runs_once() {
        let calls = AtomicUsize::new(0);

        let err = with_retry(&fast_policy(0), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(GavelError::RateLimited("slow down".to_string()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, GavelError::RateLimited(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn attempts_are_bounded() {
        let calls = AtomicUsize::new(0);

        let err = with_retry(&fast_policy(3), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(GavelError::ServiceUnavailable("down".to_string()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, GavelError::ServiceUnavailable(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
