//! Retry with exponential backoff for gateway calls

use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;

/// How often and how patiently a failing call is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry (doubles each retry)
    pub initial_backoff: Duration,
    /// Upper bound for the delay
    pub max_backoff: Duration,
    /// Upper bound for waiting on a rate limit reset
    pub max_rate_limit_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            max_rate_limit_wait: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// A policy that gives up after the first failure
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            max_rate_limit_wait: Duration::ZERO,
        }
    }

    /// Delay before retrying after `err`.
    ///
    /// A rate limit reset hint wins over the exponential `backoff`, capped by
    /// `max_rate_limit_wait`.
    pub fn delay_for(&self, err: &ProviderError, backoff: Duration) -> Duration {
        match err.retry_after() {
            Some(wait) => wait.min(self.max_rate_limit_wait),
            None => backoff,
        }
    }

    /// Run `call` until it succeeds, fails with a non-transient error, or the
    /// retries are exhausted.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(&err, backoff);
                    debug!(
                        operation,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        rate_limited = err.retry_after().is_some(),
                        error = %err,
                        "Retrying GitHub request"
                    );
                    tokio::time::sleep(delay).await;
                    backoff = (backoff * 2).min(self.max_backoff);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            max_rate_limit_wait: Duration::ZERO,
        }
    }

    fn rate_limited(reset_in: u64) -> ProviderError {
        ProviderError::Api {
            route: "/search/issues".to_string(),
            status: 403,
            message: "API rate limit exceeded".to_string(),
            retry_after: Some(reset_in),
        }
    }

    fn transient() -> ProviderError {
        ProviderError::Api {
            route: "/repos/o/r".to_string(),
            status: 503,
            message: "Service Unavailable".to_string(),
            retry_after: None,
        }
    }

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = quick(3)
            .run("repository", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(transient())
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = quick(2)
            .run("repository", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            })
            .await;

        assert_eq!(result, Err(transient()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_errors() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = quick(5)
            .run("repository", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::Api {
                    route: "/repos/o/r".to_string(),
                    status: 401,
                    message: "Bad credentials".to_string(),
                    retry_after: None,
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_none_policy_makes_a_single_attempt() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let _: Result<(), _> = RetryPolicy::none()
            .run("labels", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_prefers_reset_hint_over_backoff() {
        let policy = RetryPolicy::default();
        let backoff = Duration::from_millis(500);

        assert_eq!(
            policy.delay_for(&rate_limited(30), backoff),
            Duration::from_secs(30)
        );
        assert_eq!(
            policy.delay_for(&rate_limited(3600), backoff),
            policy.max_rate_limit_wait
        );
        assert_eq!(policy.delay_for(&transient(), backoff), backoff);
    }

    #[tokio::test]
    async fn test_waits_for_rate_limit_reset_before_retrying() {
        let policy = RetryPolicy {
            max_rate_limit_wait: Duration::from_millis(50),
            ..quick(3)
        };
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let started = std::time::Instant::now();
        let result = policy
            .run("search", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(rate_limited(60))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // zero backoff, so the wait came from the reset hint
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
