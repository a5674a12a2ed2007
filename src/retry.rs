//! Retry wrapper with bounded exponential backoff
//!
//! The retry decision is a pure function of the attempt number and the
//! error, so it can be tested without a transport or real timers.
//! [`fetch_with_retry`] drives a [`FetchClient`] with that decision.

use crate::{
    constants::{INITIAL_BACKOFF_MS, MAX_FETCH_ATTEMPTS},
    error::ProviderError,
    provider::FetchClient,
};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait, then try again
    RetryAfter(Duration),
    /// Give up and surface the error
    Fail,
}

/// Bounded exponential backoff policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Wait before the second attempt; doubles for every attempt after
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_FETCH_ATTEMPTS,
            initial_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// Policy with the default backoff and a custom attempt budget
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Attempt budget, never below one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after the given failed attempt (1-indexed): 1s, 2s, 4s, ...
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.initial_delay.saturating_mul(1u32 << exp)
    }

    /// Decides whether a failed attempt (1-indexed) should be retried
    pub fn decide(&self, attempt: u32, error: &ProviderError) -> RetryDecision {
        if error.is_terminal() || attempt >= self.attempts() {
            RetryDecision::Fail
        } else {
            RetryDecision::RetryAfter(self.delay_for_attempt(attempt))
        }
    }
}

/// Fetches `endpoint`, retrying transient failures according to `policy`
///
/// Terminal failures (400, 404, rate limiting) return after one attempt.
/// When every attempt fails, the last error is returned.
pub async fn fetch_with_retry(
    client: &dyn FetchClient,
    endpoint: &str,
    policy: &RetryPolicy,
) -> Result<Value, ProviderError> {
    fetch_decoded_with_retry(client, endpoint, policy, Ok).await
}

/// Like [`fetch_with_retry`], but runs `decode` on every response body
///
/// A body that fails to decode counts as a failed attempt and goes through
/// the same retry decision as a transport failure.
pub async fn fetch_decoded_with_retry<T, F>(
    client: &dyn FetchClient,
    endpoint: &str,
    policy: &RetryPolicy,
    decode: F,
) -> Result<T, ProviderError>
where
    F: Fn(Value) -> Result<T, ProviderError>,
{
    let mut attempt = 1;

    loop {
        let error = match client.get_json(endpoint).await.and_then(&decode) {
            Ok(body) => {
                if attempt > 1 {
                    tracing::debug!(endpoint, attempt, "Fetch succeeded after retry");
                }
                return Ok(body);
            }
            Err(e) => e,
        };

        match policy.decide(attempt, &error) {
            RetryDecision::RetryAfter(delay) => {
                tracing::warn!(
                    endpoint,
                    attempt,
                    max_attempts = policy.attempts(),
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "Fetch failed, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            RetryDecision::Fail => {
                tracing::debug!(
                    endpoint,
                    attempt,
                    terminal = error.is_terminal(),
                    error = %error,
                    "Fetch failed, giving up"
                );
                return Err(error);
            }
        }
    }
}
