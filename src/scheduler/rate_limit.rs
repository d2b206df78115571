//! Rate limit state management for coordinated backoff.
//!
//! When the remote service signals that the account is being throttled, every
//! action must pause, not just the one that tripped the signal. The producer
//! and the consumer share one RateLimiter: `trigger()` records a pause instant
//! and both call [`wait_for_clearance`] before every remote call.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::{EngageError, Result};
use crate::scheduler::lock;

/// Default cooldown on the first rate-limit signal (30 minutes).
pub const DEFAULT_BASE_COOLDOWN_SECS: u64 = 30 * 60;
/// Default cooldown growth per consecutive signal.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.5;

/// Rate limit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Cooldown after the first rate-limit signal (seconds).
    pub base_cooldown_secs: u64,
    /// Multiplier applied to the cooldown after every signal.
    pub growth_factor: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            base_cooldown_secs: DEFAULT_BASE_COOLDOWN_SECS,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl RateLimitConfig {
    /// Create config with custom values.
    pub fn new(base_cooldown_secs: u64, growth_factor: f64) -> Self {
        Self {
            base_cooldown_secs,
            growth_factor,
        }
    }

    /// Base cooldown as a Duration.
    pub fn base_cooldown(&self) -> Duration {
        Duration::from_secs(self.base_cooldown_secs)
    }
}

/// Exponentially growing cooldown shared by every remote action of a session.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    base: Duration,
    growth_factor: f64,
    cooldown: Duration,
    trigger_count: u32,
    /// When remote calls may resume (None = no active pause).
    paused_until: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter with an explicit base cooldown and growth factor.
    pub fn new(base: Duration, growth_factor: f64) -> Self {
        Self {
            base,
            growth_factor,
            cooldown: base,
            trigger_count: 0,
            paused_until: None,
        }
    }

    /// Create a limiter from configuration.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.base_cooldown(), config.growth_factor)
    }

    /// The cooldown the next rate-limit signal will impose.
    pub fn current_cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Number of signals since the last reset.
    pub fn trigger_count(&self) -> u32 {
        self.trigger_count
    }

    /// Check if remote calls are currently paused.
    pub fn is_rate_limited(&self) -> bool {
        self.remaining_backoff().is_some()
    }

    /// Get remaining pause if rate limited.
    pub fn remaining_backoff(&self) -> Option<Duration> {
        self.paused_until.and_then(|until| {
            let now = Instant::now();
            if now < until { Some(until - now) } else { None }
        })
    }

    /// `Err(RateLimited)` carrying the remaining pause while one is active.
    pub fn check(&self) -> Result<()> {
        match self.remaining_backoff() {
            Some(cooldown) => Err(EngageError::RateLimited { cooldown }),
            None => Ok(()),
        }
    }

    /// Record a rate-limit signal.
    ///
    /// Pauses all remote calls for the current cooldown, returns that cooldown,
    /// then grows it for the next signal. A pause already running further out
    /// is kept.
    pub fn trigger(&mut self) -> Duration {
        let wait = self.cooldown;
        self.trigger_count += 1;
        self.cooldown = self.cooldown.mul_f64(self.growth_factor);

        let until = Instant::now() + wait;
        if self.paused_until.is_none_or(|current| current < until) {
            self.paused_until = Some(until);
        }

        tracing::warn!(
            cooldown_secs = wait.as_secs(),
            next_cooldown_secs = self.cooldown.as_secs(),
            trigger_count = self.trigger_count,
            "Rate limited, backing off globally"
        );

        wait
    }

    /// Restore the base cooldown after a successful action.
    ///
    /// An active pause is left to run out.
    pub fn reset(&mut self) {
        if self.trigger_count > 0 {
            tracing::info!(
                trigger_count = self.trigger_count,
                "Action succeeded, cooldown back to base"
            );
        }
        self.cooldown = self.base;
        self.trigger_count = 0;
    }
}

/// Sleep until no pause is active. Returns the total time waited.
///
/// Re-checks after every sleep, so a pause extended meanwhile is honored too.
pub async fn wait_for_clearance(limiter: &Mutex<RateLimiter>) -> Duration {
    let mut waited = Duration::ZERO;
    loop {
        let Err(EngageError::RateLimited { cooldown }) = lock(limiter).check() else {
            return waited;
        };
        tracing::debug!(remaining_secs = cooldown.as_secs(), "Remote calls paused, waiting");
        tokio::time::sleep(cooldown).await;
        waited += cooldown;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
