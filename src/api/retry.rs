use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

/// Bounded retry with exponential backoff. Written as an explicit attempt
/// loop with an injected sleep so the bound and the backoff curve are
/// testable without real delays.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            // A zero bound would never issue the first attempt.
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the retry that follows `attempt` (1-based):
    /// base, base*2, base*4, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. Only `ApiError::Transient` is retried;
    /// every other failure propagates immediately.
    pub async fn run<T, F, Fut, S, SFut>(&self, mut op: F, mut sleep: S) -> Result<T, ApiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        S: FnMut(Duration) -> SFut,
        SFut: Future<Output = ()>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    tracing::debug!(attempt, ?delay, error = %err, "transient failure, retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(500))
    }

    // ==================== backoff curve ====================

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let p = policy();
        assert_eq!(p.backoff(1), Duration::from_millis(500));
        assert_eq!(p.backoff(2), Duration::from_secs(1));
        assert_eq!(p.backoff(3), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_max_attempts_clamped_to_one() {
        let p = RetryPolicy::new(0, Duration::from_millis(1));
        assert_eq!(p.max_attempts, 1);
    }

    // ==================== retry loop ====================

    #[tokio::test]
    async fn test_success_on_first_attempt_never_sleeps() {
        let slept = Cell::new(0u32);

        let result = policy()
            .run(
                |_| async { Ok::<_, ApiError>(42) },
                |_| {
                    slept.set(slept.get() + 1);
                    async {}
                },
            )
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(slept.get(), 0);
    }

    #[tokio::test]
    async fn test_two_timeouts_then_success() {
        let sleeps = RefCell::new(Vec::new());

        let result = policy()
            .run(
                |attempt| async move {
                    if attempt < 3 {
                        Err(ApiError::Transient("timed out".into()))
                    } else {
                        Ok("headline")
                    }
                },
                |delay| {
                    sleeps.borrow_mut().push(delay);
                    async {}
                },
            )
            .await;

        assert_eq!(result.unwrap(), "headline");
        // exactly two retries, with the doubling delays
        assert_eq!(
            *sleeps.borrow(),
            vec![Duration::from_millis(500), Duration::from_secs(1)]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_transient() {
        let attempts = Cell::new(0u32);

        let result: Result<(), ApiError> = policy()
            .run(
                |_| {
                    attempts.set(attempts.get() + 1);
                    async { Err(ApiError::Transient("connection refused".into())) }
                },
                |_| async {},
            )
            .await;

        assert!(matches!(result.unwrap_err(), ApiError::Transient(_)));
        assert_eq!(attempts.get(), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_propagates_immediately() {
        let attempts = Cell::new(0u32);

        let result: Result<(), ApiError> = policy()
            .run(
                |_| {
                    attempts.set(attempts.get() + 1);
                    async {
                        Err(ApiError::RateLimited {
                            retry_after: Some(60),
                        })
                    }
                },
                |_| async {},
            )
            .await;

        assert!(matches!(result.unwrap_err(), ApiError::RateLimited { .. }));
        assert_eq!(attempts.get(), 1);
    }

    #[tokio::test]
    async fn test_malformed_response_not_retried() {
        let attempts = Cell::new(0u32);

        let result: Result<(), ApiError> = policy()
            .run(
                |_| {
                    attempts.set(attempts.get() + 1);
                    async { Err(ApiError::MalformedResponse("bad json".into())) }
                },
                |_| async {},
            )
            .await;

        assert!(matches!(
            result.unwrap_err(),
            ApiError::MalformedResponse(_)
        ));
        assert_eq!(attempts.get(), 1);
    }
}
