use std::time::Duration;

use bon::Builder;
use rand::Rng;

/// How a shared subscription reopens its stream after a transient failure.
///
/// Delays grow geometrically from `initial_delay` by `multiplier` and are capped at `max_delay`.
/// With `jitter` each delay is scaled by a random factor in `[0.5, 1.0]`. The attempt counter
/// restarts whenever an item is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct RetryPolicy {
    #[builder(default = Duration::from_millis(20))]
    pub initial_delay: Duration,

    #[builder(default = Duration::from_secs(2))]
    pub max_delay: Duration,

    #[builder(default = 2.0)]
    pub multiplier: f64,

    #[builder(default = true)]
    pub jitter: bool,

    /// Consecutive failed attempts tolerated before the subscription gives up. `None` retries
    /// forever, so transient failures never reach listeners.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Reopen at once, forever. Only sensible against a local backend that is momentarily not
    /// ready; against a flaky remote it spins.
    pub fn immediate() -> Self {
        Self::builder()
            .initial_delay(Duration::ZERO)
            .max_delay(Duration::ZERO)
            .jitter(false)
            .build()
    }

    /// Delay before reopen attempt `attempt` (1-based), or `None` once the budget is spent.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if self.max_attempts.is_some_and(|max| attempt > max) {
            return None;
        }
        if self.initial_delay.is_zero() {
            return Some(Duration::ZERO);
        }

        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let scaled = self.initial_delay.as_secs_f64() * self.multiplier.max(1.0).powi(exponent);
        let capped = scaled.min(self.max_delay.as_secs_f64());
        let delay = Duration::try_from_secs_f64(capped).unwrap_or(self.max_delay);

        if self.jitter {
            Some(delay.mul_f64(rand::rng().random_range(0.5..=1.0)))
        } else {
            Some(delay)
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}
