//! Retry policy for calls that persist settlement results.
//!
//! Settlement itself is pure; the writes that follow it (participant
//! amounts, deal status, invoices) go to a remote store and can fail
//! transiently. Callers wrap those writes in [`RetryPolicy::run`] at the call
//! site. Only errors for which
//! [`DealError::is_transient`](standup_types::DealError::is_transient) holds
//! are retried.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use standup_types::{Result, RetryConfig};

/// Exponential backoff with optional full jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    #[must_use]
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Delay before retry number `retry` (1-based).
    ///
    /// `base * 2^(retry - 1)`, capped at `max_delay_ms`. With jitter the
    /// delay is drawn uniformly from `0..=` that value.
    pub fn delay_for<R: Rng + ?Sized>(&self, retry: u32, rng: &mut R) -> Duration {
        let factor = 1u64
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let capped = self
            .config
            .base_delay_ms
            .saturating_mul(factor)
            .min(self.config.max_delay_ms);
        let ms = if self.config.jitter {
            rng.gen_range(0..=capped)
        } else {
            capped
        };
        Duration::from_millis(ms)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. The last error is returned
    /// unchanged.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && attempt < self.config.max_attempts => {
                    let delay = self.delay_for(attempt, &mut rand::thread_rng());
                    tracing::warn!(
                        operation,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        tracing::warn!(operation, attempt, error = %err, "Retries exhausted");
                    }
                    return Err(err);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use standup_types::{DealError, DealId};

    use super::*;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_attempts,
            base_delay_ms: 1,
            max_delay_ms: 2,
            jitter: false,
        })
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn exponential_delays_are_capped() {
        let policy = RetryPolicy::new(RetryConfig {
            max_attempts: 10,
            base_delay_ms: 200,
            max_delay_ms: 5_000,
            jitter: false,
        });
        let mut rng = StdRng::seed_from_u64(7);
        let delays: Vec<u64> = (1..=7)
            .map(|n| policy.delay_for(n, &mut rng).as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![200, 400, 800, 1_600, 3_200, 5_000, 5_000]);
        assert_eq!(policy.delay_for(200, &mut rng), Duration::from_millis(5_000));
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn jittered_delays_stay_within_bound() {
        let policy = RetryPolicy::default();
        let mut rng = StdRng::seed_from_u64(42);
        for retry in 1..=6 {
            let bound = (200u64 << (retry - 1)).min(5_000);
            for _ in 0..50 {
                let delay = policy.delay_for(retry, &mut rng).as_millis() as u64;
                assert!(delay <= bound, "retry={retry} delay={delay} bound={bound}");
            }
        }
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let result = fast(3)
            .run("persist_amounts", |attempt| async move {
                if attempt < 3 {
                    Err(DealError::Persistence("connection reset".into()))
                } else {
                    Ok(attempt)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let deal = DealId::new();
        let err = fast(5)
            .run("settle", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err::<(), _>(DealError::AlreadySettled(deal)) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DealError::AlreadySettled(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let err = fast(4)
            .run("persist_invoice", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(DealError::Io("timeout".into())) }
            })
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn single_attempt_policy_never_sleeps() {
        let calls = AtomicU32::new(0);
        let _ = fast(1)
            .run("once", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(DealError::Persistence("down".into())) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
