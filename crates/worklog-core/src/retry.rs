//! Bounded retry with fixed or exponential backoff.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Delay between attempts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Backoff {
    /// Sleep the same delay after every failure.
    Fixed { delay_ms: u64 },
    /// Sleep `base_ms * 2^(attempt - 1)` after failed attempt `attempt`.
    Exponential { base_ms: u64 },
}

impl Backoff {
    /// Delay to sleep after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            Backoff::Exponential { base_ms } => {
                let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
                Duration::from_millis(base_ms.saturating_mul(factor))
            }
        }
    }
}

/// How many times to try a fallible operation and how long to wait between
/// tries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first (values below 1 are treated as 1).
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Fixed { delay_ms: 1_000 },
        }
    }
}

/// Raised when every attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn into_last_error(self) -> E {
        match self {
            RetryError::Exhausted { last_error, .. } => last_error,
        }
    }
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed {
                delay_ms: delay.as_millis() as u64,
            },
        }
    }

    pub fn exponential(max_attempts: u32, base: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential {
                base_ms: base.as_millis() as u64,
            },
        }
    }

    /// Run once, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::Fixed { delay_ms: 0 },
        }
    }

    /// Run `op` until it succeeds or attempts run out.
    ///
    /// `what` names the operation in log lines.
    pub async fn run<T, E, F, Fut>(&self, what: &str, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= max_attempts => {
                    warn!(operation = what, attempt, error = %err, "giving up");
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last_error: err,
                    });
                }
                Err(err) => {
                    let delay = self.backoff.delay_after(attempt);
                    warn!(
                        operation = what,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_exponential_delays_double() {
        let b = Backoff::Exponential { base_ms: 100 };
        assert_eq!(b.delay_after(1), Duration::from_millis(100));
        assert_eq!(b.delay_after(2), Duration::from_millis(200));
        assert_eq!(b.delay_after(4), Duration::from_millis(800));
    }

    #[test]
    fn test_fixed_delay_is_constant() {
        let b = Backoff::Fixed { delay_ms: 250 };
        assert_eq!(b.delay_after(1), b.delay_after(7));
    }

    #[test]
    fn test_policy_serde_shape() {
        let json = serde_json::to_value(RetryPolicy::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "max_attempts": 3,
                "backoff": { "kind": "fixed", "delay_ms": 1000 }
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::exponential(4, Duration::from_millis(10));
        let out: Result<&str, RetryError<String>> = policy
            .run("flaky", move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(format!("boom {n}"))
                } else {
                    Ok("ok")
                }
            })
            .await;
        assert_eq!(out.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::fixed(3, Duration::from_millis(5));
        let err = policy
            .run("always-down", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("down")
            })
            .await
            .unwrap_err();
        assert_eq!(err.attempts(), 3);
        assert_eq!(err.to_string(), "gave up after 3 attempt(s): down");
        assert_eq!(err.into_last_error(), "down");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy {
            max_attempts: 0,
            backoff: Backoff::Fixed { delay_ms: 0 },
        };
        let _ = policy
            .run("once", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("no")
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
