//! Retry policy and per-image backoff state

use std::time::Duration;

/// How uploads are retried and paced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// First retry delay; also the pacing delay between images
    pub base_delay: Duration,
    /// Ceiling for the doubling retry delay
    pub max_delay: Duration,
    /// Attempt ceiling per image; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(1024),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Create an unbounded policy with the given delays
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            max_attempts: None,
        }
    }

    /// Stop retrying after `attempts` total attempts
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Delay before the `retry`-th retry (1-based)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        std::cmp::min(self.base_delay.saturating_mul(factor), self.max_delay)
    }

    /// Whether another attempt is allowed after `attempts_made`
    pub fn allows_attempt(&self, attempts_made: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts_made < max)
    }

    /// Fresh backoff state for a new image
    pub fn backoff(&self) -> Backoff {
        Backoff {
            current: self.base_delay,
            max: self.max_delay,
        }
    }
}

/// Retry delay state for one image
///
/// Starts at the base delay and doubles after every use, capped at the max.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    max: Duration,
}

impl Backoff {
    /// Delay the next retry would wait
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Take the current delay and advance to the next one
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = std::cmp::min(self.current.saturating_mul(2), self.max);
        delay
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}
