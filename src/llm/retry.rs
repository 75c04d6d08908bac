//! Exponential backoff for message generation.

use std::future::Future;
use std::time::Duration;

use crate::constants::commit::{DEFAULT_MAX_ATTEMPTS, RETRY_DELAY_UNIT_MS};
use crate::error::{Result, WizardError};

/// How often and how patiently a failing call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Zero behaves as one.
    pub max_attempts: usize,
    /// Delay before the second attempt; doubles for every later one.
    pub delay_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_unit: Duration::from_millis(RETRY_DELAY_UNIT_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay_unit: Duration) -> Self {
        Self {
            max_attempts,
            delay_unit,
        }
    }

    /// Wait after the failed attempt `attempt` (0-based): `unit * 2^attempt`.
    pub fn backoff_delay(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.delay_unit.saturating_mul(factor)
    }

    /// Runs `op` until it succeeds or the attempts run out.
    ///
    /// `on_retry(next_attempt, delay)` fires before every wait; no wait
    /// follows the last attempt. Non-retryable errors (cancellation, missing
    /// credentials) return at once. Intermediate errors are only logged; the
    /// final error is [`WizardError::MaxRetriesExceeded`] carrying the last
    /// underlying message.
    pub async fn run<T, F, Fut, R>(&self, mut op: F, mut on_retry: R) -> Result<T>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T>>,
        R: FnMut(usize, Duration),
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = String::from("unknown error");

        for attempt in 0..attempts {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    tracing::debug!("Attempt {}/{} failed: {}", attempt + 1, attempts, e);
                    last_error = e.to_string();
                }
            }

            if attempt + 1 < attempts {
                let delay = self.backoff_delay(attempt);
                on_retry(attempt + 1, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(WizardError::MaxRetriesExceeded {
            attempts,
            last_error,
        })
    }
}
