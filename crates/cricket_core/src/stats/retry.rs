//! Bounded exponential backoff for flaky collaborators.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total tries, including the first
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay_ms: 200, multiplier: 2.0 }
    }
}

impl RetryPolicy {
    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self { max_attempts, base_delay_ms: 0, multiplier: 1.0 }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry.saturating_sub(1) as i32);
        Duration::from_millis((self.base_delay_ms as f64 * factor).round() as u64)
    }
}

/// Marks errors worth another attempt.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for crate::error::StoreError {
    fn is_transient(&self) -> bool {
        crate::error::StoreError::is_transient(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryError<E> {
    pub attempts: u32,
    pub last: E,
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gave up after {} attempt(s): {}", self.attempts, self.last)
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for RetryError<E> {}

/// Run `op` until it succeeds, fails with a permanent error, or the policy's
/// attempts are spent. Sleeps on the current thread between attempts.
pub fn retry_with_backoff<T, E, F>(policy: &RetryPolicy, op: F) -> Result<T, RetryError<E>>
where
    E: Transient + std::fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    retry_with_backoff_using(policy, std::thread::sleep, op)
}

/// As [`retry_with_backoff`] with an injectable sleep.
pub fn retry_with_backoff_using<T, E, F, S>(
    policy: &RetryPolicy,
    mut sleep: S,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: Transient + std::fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
    S: FnMut(Duration),
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                log::warn!("attempt {}/{} failed: {}; retrying in {:?}", attempt, max_attempts, err, delay);
                sleep(delay);
                attempt += 1;
            }
            Err(err) => {
                log::warn!("giving up after {} attempt(s): {}", attempt, err);
                return Err(RetryError { attempts: attempt, last: err });
            }
        }
    }
}
