// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry budget and delay curves.

use std::time::Duration;

/// Delay curve between delivery attempts.
///
/// Every curve is monotonically non-decreasing in the attempt number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay after every failure
    Fixed(Duration),
    /// `initial`, `initial + step`, `initial + 2 * step`, ...
    Linear { initial: Duration, step: Duration },
    /// `initial`, doubling after each failure, never above `max`
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Delay after the `attempt`-th failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let n = attempt.max(1) - 1;
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Linear { initial, step } => initial.saturating_add(step.saturating_mul(n)),
            Backoff::Exponential { initial, max } => {
                let factor = 2u32.checked_pow(n).unwrap_or(u32::MAX);
                initial.saturating_mul(factor).min(max.max(initial))
            }
        }
    }
}

impl Default for Backoff {
    /// 1s, 2s, 4s, ... capped at 30s
    fn default() -> Self {
        Backoff::Exponential { initial: Duration::from_secs(1), max: Duration::from_secs(30) }
    }
}

/// How many times to try, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; at least 1
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff }
    }

    /// A single attempt, no retries
    pub fn once() -> Self {
        Self::new(1, Backoff::Fixed(Duration::ZERO))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Backoff::default())
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
