//! Retry policy for partner API calls.

use std::time::Duration;

/// Bounded exponential backoff between `min_wait` and `max_wait`
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub min_wait: Duration,
    /// Upper bound for any single delay.
    pub max_wait: Duration,
    /// Spread each delay by up to 25% in either direction, kept within bounds.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Never retry
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn with_wait(mut self, min_wait: Duration, max_wait: Duration) -> Self {
        self.min_wait = min_wait;
        self.max_wait = max_wait;
        self
    }

    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry number `attempt` (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let min_ms = self.min_wait.as_millis() as f64;
        let max_ms = (self.max_wait.as_millis() as f64).max(min_ms);
        let base = min_ms * 2_f64.powi(attempt.min(31) as i32);
        let capped = base.min(max_ms);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).clamp(min_ms, max_ms)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }

    /// Backoff schedule, one entry per allowed retry
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).map(move |attempt| self.delay_for_attempt(attempt))
    }
}
