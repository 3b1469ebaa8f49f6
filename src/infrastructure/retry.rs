//! Retry policy
//!
//! Fixed attempt budget with linear backoff. Every failure is retried, the
//! policy does not try to tell transient errors from permanent ones.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// Retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Backoff unit
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before attempt `attempt` (1-based): `(attempt - 1) * base_delay`
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt.saturating_sub(1)
    }

    /// Runs `op` until it succeeds or the budget is spent
    ///
    /// # Arguments
    /// - `label`: shown in the retry log lines
    /// - `op`: called with the 1-based attempt number
    ///
    /// # Returns
    /// The first success, or the error of the final attempt
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => return Err(e),
                Err(e) => {
                    attempt += 1;
                    let delay = self.delay_before(attempt);
                    warn!(
                        "[{}] attempt {}/{} failed: {}, retrying in {:?}",
                        label,
                        attempt - 1,
                        max_attempts,
                        e,
                        delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(5, Duration::from_millis(1))
    }

    #[test]
    fn test_delay_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_before(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_before(5), Duration::from_millis(8000));
    }

    #[tokio::test]
    async fn test_succeeds_after_m_failures() {
        for failures in 0..5u32 {
            let calls = Arc::new(AtomicU32::new(0));
            let counter = calls.clone();

            let result: Result<u32, String> = fast_policy()
                .run("flaky", |attempt| {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        if attempt <= failures {
                            Err(format!("failure {}", attempt))
                        } else {
                            Ok(attempt)
                        }
                    }
                })
                .await;

            assert_eq!(result, Ok(failures + 1));
            assert_eq!(calls.load(Ordering::SeqCst), failures + 1);
        }
    }

    #[tokio::test]
    async fn test_always_failing_stops_after_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), String> = fast_policy()
            .run("down", |attempt| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(format!("failure {}", attempt))
                }
            })
            .await;

        assert_eq!(result, Err("failure 5".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_between_attempts() {
        let policy = RetryPolicy::default();
        let started = tokio::time::Instant::now();

        let _: Result<(), &str> = policy.run("paused", |_| async { Err("nope") }).await;

        // 2s + 4s + 6s + 8s
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(20));
        assert!(elapsed < Duration::from_secs(21));
    }
}
