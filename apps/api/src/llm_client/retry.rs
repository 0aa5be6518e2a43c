use std::future::Future;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_FALLBACK: &str =
    "The AI analysis is temporarily unavailable. Please try again in a few minutes.";

/// Bounded retry: at most `max_attempts` calls with a fixed `delay` between
/// them. Only errors the caller marks as retryable are retried. `fallback`
/// is the text shown to the user once every attempt has failed.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub fallback: String,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl RetryPolicy {
    pub async fn run<T, E, F, Fut, R>(&self, mut operation: F, is_retryable: R) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && is_retryable(&e) => {
                    warn!(
                        "Attempt {attempt}/{max_attempts} failed ({e}), retrying after {}ms...",
                        self.delay.as_millis()
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum FakeError {
        Busy,
        Broken,
    }

    impl std::fmt::Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    fn is_busy(e: &FakeError) -> bool {
        *e == FakeError::Busy
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_attempts_exhausted() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result: Result<(), FakeError> = policy
            .run(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(FakeError::Busy) }
                },
                is_busy,
            )
            .await;

        assert_eq!(result, Err(FakeError::Busy));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // two sleeps between three attempts
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_returns_immediately() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);

        let result: Result<(), FakeError> = policy
            .run(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(FakeError::Broken) }
                },
                is_busy,
            )
            .await;

        assert_eq!(result, Err(FakeError::Broken));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_rate_limit() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);

        let result = policy
            .run(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n == 0 {
                            Err(FakeError::Busy)
                        } else {
                            Ok("done")
                        }
                    }
                },
                is_busy,
            )
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_calls_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let calls = AtomicU32::new(0);

        let _: Result<(), FakeError> = policy
            .run(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(FakeError::Busy) }
                },
                is_busy,
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
