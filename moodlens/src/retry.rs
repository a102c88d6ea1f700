//! Bounded retry around generator calls.
//!
//! Generation is single-shot by default (`max_attempts = 1`). Raising the
//! attempt count retries transient generator failures before the rewrite
//! falls back to rule-based softening.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How the pause grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// Doubles after every failed attempt.
    #[default]
    Exponential,
    /// Grows by the base delay after every failed attempt.
    Linear,
    /// Always the base delay.
    Constant,
}

impl BackoffStrategy {
    /// Un-jittered pause in milliseconds before retry number `retry`
    /// (zero-based), capped at `cap_ms`.
    #[must_use]
    pub fn pause_ms(self, base_ms: u64, cap_ms: u64, retry: usize) -> u64 {
        let grown = match self {
            Self::Exponential => {
                let shift = u32::try_from(retry).unwrap_or(u32::MAX);
                base_ms.saturating_mul(2u64.saturating_pow(shift))
            }
            Self::Linear => {
                let steps = u64::try_from(retry).unwrap_or(u64::MAX);
                base_ms.saturating_mul(steps.saturating_add(1))
            }
            Self::Constant => base_ms,
        };
        grown.min(cap_ms)
    }
}

/// Randomisation applied on top of the backoff pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterStrategy {
    /// Use the pause as is.
    None,
    /// Anywhere in `[0, pause]`.
    #[default]
    Full,
    /// Anywhere in `[pause / 2, pause]`.
    Equal,
}

impl JitterStrategy {
    /// Applies the jitter to `pause_ms`.
    #[must_use]
    pub fn apply(self, pause_ms: u64) -> u64 {
        let mut rng = rand::thread_rng();
        match self {
            Self::None => pause_ms,
            Self::Full => rng.gen_range(0..=pause_ms),
            Self::Equal => {
                let floor = pause_ms / 2;
                floor + rng.gen_range(0..=pause_ms - floor)
            }
        }
    }
}

/// Retry policy for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total generator calls allowed, the first included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Pause before the first retry, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound on any pause, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Growth of the pause between attempts.
    #[serde(default)]
    pub backoff_strategy: BackoffStrategy,
    /// Randomisation of each pause.
    #[serde(default)]
    pub jitter_strategy: JitterStrategy,
}

const fn default_max_attempts() -> usize {
    1
}

const fn default_base_delay_ms() -> u64 {
    250
}

const fn default_max_delay_ms() -> u64 {
    2000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_strategy: BackoffStrategy::default(),
            jitter_strategy: JitterStrategy::default(),
        }
    }
}

impl RetryConfig {
    /// Single-shot policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows up to `max_attempts` generator calls.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the first pause.
    #[must_use]
    pub fn with_base_delay_ms(mut self, ms: u64) -> Self {
        self.base_delay_ms = ms;
        self
    }

    /// Sets the pause cap.
    #[must_use]
    pub fn with_max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff_strategy = backoff;
        self
    }

    /// Sets the jitter strategy.
    #[must_use]
    pub fn with_jitter(mut self, jitter: JitterStrategy) -> Self {
        self.jitter_strategy = jitter;
        self
    }

    /// Pause before retry number `retry` (zero-based), jitter included.
    #[must_use]
    pub fn delay_for(&self, retry: usize) -> Duration {
        let pause = self
            .backoff_strategy
            .pause_ms(self.base_delay_ms, self.max_delay_ms, retry);
        Duration::from_millis(self.jitter_strategy.apply(pause))
    }
}

/// Calls `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or `config.max_attempts` calls have been made. At least one call
/// is always made.
pub async fn with_retry<T, E, Op, Fut, Pred>(
    config: &RetryConfig,
    mut is_retryable: Pred,
    mut operation: Op,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    Pred: FnMut(&E) -> bool,
{
    let budget = config.max_attempts.max(1);
    let mut failures = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        failures += 1;
        if failures >= budget || !is_retryable(&err) {
            return Err(err);
        }

        let pause = config.delay_for(failures - 1);
        debug!(
            attempt = failures,
            budget,
            pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "Generation attempt failed, retrying"
        );
        tokio::time::sleep(pause).await;
    }
}
