// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry loop shared by the generation call and the video download.
//!
//! Each attempt runs under its own timeout. Only errors for which
//! [`ReelgenError::is_retryable`] holds are retried; the cancellation token is
//! checked before every attempt and during every backoff sleep.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ReelgenError;

/// Exponential backoff, doubling from `base` and capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
        }
    }

    /// Fixed delay between attempts.
    pub fn fixed(delay: Duration) -> Self {
        Self::new(delay, delay)
    }

    /// Delay to wait after the given 1-based failed attempt.
    ///
    /// Non-decreasing in `attempt` and never above `max`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.max)
            .min(self.max)
    }
}

/// Attempt cap, backoff, and per-attempt timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub backoff: Backoff,
    pub timeout: Duration,
}

impl RetryPolicy {
    /// Upper bound on wall time spent in [`run`](Self::run), timeouts plus sleeps.
    pub fn worst_case(&self) -> Duration {
        let attempts = self.max_attempts.max(1);
        let sleeps: Duration = (1..attempts).map(|a| self.backoff.delay(a)).sum();
        self.timeout * attempts + sleeps
    }

    /// Runs `op` until it succeeds, fails non-retryably, or the cap is hit.
    ///
    /// `op` receives the 1-based attempt number. Exhausting the cap on a
    /// retryable failure returns [`ReelgenError::Exhausted`] wrapping the last
    /// error.
    pub async fn run<T, F, Fut>(
        &self,
        operation: &str,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, ReelgenError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ReelgenError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            if cancel.is_cancelled() {
                return Err(ReelgenError::Cancelled);
            }

            debug!(operation, attempt, max_attempts, "starting attempt");
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ReelgenError::Cancelled),
                r = tokio::time::timeout(self.timeout, op(attempt)) => r.unwrap_or_else(|_| {
                    Err(ReelgenError::Timeout { duration: self.timeout })
                }),
            };

            let err = match result {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if attempt >= max_attempts {
                warn!(operation, attempts = attempt, error = %err, "retries exhausted");
                return Err(ReelgenError::Exhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.backoff.delay(attempt);
            warn!(
                operation,
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retryable failure, backing off"
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ReelgenError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
