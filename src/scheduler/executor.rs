//! Action executor: one remote like or comment, paced and classified.
//!
//! Every call first waits out any active pause on the shared RateLimiter. After
//! an accepted action the executor sleeps a random delay drawn from the
//! configured bounds. A throttling response triggers the RateLimiter, which
//! pauses the producer as well, and the executor waits the pause out before
//! returning. Any other failure is logged and reported; the executor never
//! retries.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::client::{ClientError, FeedClient};
use crate::domain::{ActionKind, ActionOutcome, Item};
use crate::error::{EngageError, Result};
use crate::scheduler::lock;
use crate::scheduler::rate_limit::{RateLimiter, wait_for_clearance};
use crate::scheduler::stats::EngagementStats;

/// Post-action delay bounds, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_like_timeout_secs: u64,
    pub max_like_timeout_secs: u64,
    pub min_comment_timeout_secs: u64,
    pub max_comment_timeout_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_like_timeout_secs: 10,
            max_like_timeout_secs: 30,
            min_comment_timeout_secs: 60,
            max_comment_timeout_secs: 180,
        }
    }
}

impl PacingConfig {
    /// Delay bounds for an action kind.
    pub fn bounds(&self, kind: ActionKind) -> (Duration, Duration) {
        match kind {
            ActionKind::Like => (
                Duration::from_secs(self.min_like_timeout_secs),
                Duration::from_secs(self.max_like_timeout_secs),
            ),
            ActionKind::Comment => (
                Duration::from_secs(self.min_comment_timeout_secs),
                Duration::from_secs(self.max_comment_timeout_secs),
            ),
        }
    }

    /// Draw a post-action delay for an action kind.
    pub fn delay_for(&self, kind: ActionKind) -> Duration {
        let (min, max) = self.bounds(kind);
        jitter(min, max)
    }
}

/// Uniform draw from `[min, max]`. Returns `min` when the range is empty.
pub fn jitter(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let millis = rand::rng().random_range(min.as_millis() as u64..=max.as_millis() as u64);
    Duration::from_millis(millis)
}

/// Pick one comment uniformly at random.
pub fn choose_comment(candidates: &[String]) -> Result<&str> {
    if candidates.is_empty() {
        return Err(EngageError::ConfigValidation("no comment candidates".to_string()));
    }
    let index = rand::rng().random_range(0..candidates.len());
    Ok(&candidates[index])
}

/// Performs remote actions on behalf of the consumer.
pub struct ActionExecutor {
    client: Arc<dyn FeedClient>,
    rate_limit: Arc<Mutex<RateLimiter>>,
    stats: Arc<Mutex<EngagementStats>>,
    pacing: PacingConfig,
}

impl ActionExecutor {
    pub fn new(
        client: Arc<dyn FeedClient>,
        rate_limit: Arc<Mutex<RateLimiter>>,
        stats: Arc<Mutex<EngagementStats>>,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            client,
            rate_limit,
            stats,
            pacing,
        }
    }

    /// Like an item.
    pub async fn like(&self, item: &Item) -> ActionOutcome {
        wait_for_clearance(&self.rate_limit).await;
        let result = self.client.like_item(&item.id).await;
        self.settle(ActionKind::Like, item, result).await
    }

    /// Comment on an item.
    pub async fn comment(&self, item: &Item, text: &str) -> ActionOutcome {
        wait_for_clearance(&self.rate_limit).await;
        let result = self.client.comment_item(&item.id, text).await;
        self.settle(ActionKind::Comment, item, result).await
    }

    async fn settle(
        &self,
        kind: ActionKind,
        item: &Item,
        result: std::result::Result<(), ClientError>,
    ) -> ActionOutcome {
        let outcome = match result {
            Ok(()) => {
                lock(&self.rate_limit).reset();
                let delay = self.pacing.delay_for(kind);
                tracing::info!(
                    media_id = %item.id,
                    owner = %item.owner,
                    action = %kind,
                    delay_secs = delay.as_secs(),
                    "Action accepted"
                );
                tokio::time::sleep(delay).await;
                ActionOutcome::Done
            }
            Err(err) if err.is_rate_limit() => {
                let cooldown = lock(&self.rate_limit).trigger();
                tracing::warn!(
                    media_id = %item.id,
                    action = %kind,
                    error = %err,
                    cooldown_secs = cooldown.as_secs(),
                    "Action throttled, pausing all actions"
                );
                let waited = wait_for_clearance(&self.rate_limit).await;
                ActionOutcome::RateLimited { waited }
            }
            Err(err) => {
                let err = EngageError::from(err);
                tracing::warn!(
                    media_id = %item.id,
                    action = %kind,
                    error = %err,
                    "Action failed, skipping"
                );
                ActionOutcome::Failed(err.to_string())
            }
        };

        lock(&self.stats).action(kind, &outcome);
        outcome
    }
}
