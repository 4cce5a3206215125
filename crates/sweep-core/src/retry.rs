//! Bounded exponential backoff for transient transport failures.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SweepError};

/// Backoff parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(32) as i32;
        let delay = (self.initial_delay_ms as f64) * self.multiplier.powi(exp);
        let delay = delay.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(delay as u64)
    }

    /// Runs `op` until it succeeds, fails with a non-transient error, or the
    /// attempt budget is spent. Exhaustion yields
    /// [`SweepError::TransportExhausted`] without a transaction hash.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(v) => return Ok(v),
                Err(SweepError::TransientTransport(msg)) if attempt < max => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(%what, attempt, ?delay, error = %msg, "transient failure, backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(SweepError::TransientTransport(msg)) => {
                    return Err(SweepError::TransportExhausted {
                        attempts: attempt,
                        last: msg,
                        tx_hash: None,
                    })
                }
                Err(e) => return Err(e),
            }
        }
    }
}
