//! Simulated feed client for dry runs
//!
//! Produces a plausible stream of feed items and accepts every action, with an
//! occasional throttling response so the backoff path gets exercised. Nothing
//! leaves the process.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::Rng;

use super::{ClientError, FeedClient};
use crate::domain::Item;
use crate::id::{generate_media_id, now_ms};

const OWNERS: &[&str] = &["ana.photos", "brightside", "coastal_eats", "dawnrunner", "ember.studio"];

/// Self-contained FeedClient that never touches the network
pub struct SimulatedFeedClient {
    /// Maximum items returned per fetch
    batch_size: usize,
    /// Probability that a like or comment is throttled
    throttle_chance: f64,
    actions: Mutex<u64>,
}

impl Default for SimulatedFeedClient {
    fn default() -> Self {
        Self::new(8, 0.01)
    }
}

impl SimulatedFeedClient {
    pub fn new(batch_size: usize, throttle_chance: f64) -> Self {
        Self {
            batch_size,
            throttle_chance: throttle_chance.clamp(0.0, 1.0),
            actions: Mutex::new(0),
        }
    }

    /// Number of like/comment calls accepted so far
    pub fn actions(&self) -> u64 {
        *self.actions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn act(&self, kind: &str, id: &str) -> Result<(), ClientError> {
        if rand::rng().random_bool(self.throttle_chance) {
            return Err(ClientError::Api(format!("feedback_required while trying to {}", kind)));
        }
        *self.actions.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        tracing::debug!(media_id = %id, action = kind, "Simulated action accepted");
        Ok(())
    }
}

#[async_trait]
impl FeedClient for SimulatedFeedClient {
    async fn authenticate(&self, username: &str, _password: &str) -> Result<(), ClientError> {
        tracing::info!(username = %username, "Simulated login");
        Ok(())
    }

    async fn solve_challenge(&self, _code: &str) -> Result<(), ClientError> {
        Ok(())
    }

    async fn fetch_feed_items(&self) -> Result<Vec<Item>, ClientError> {
        let mut rng = rand::rng();
        let count = rng.random_range(0..=self.batch_size);
        let now = now_ms();

        let items = (0..count)
            .map(|i| {
                let owner = OWNERS[rng.random_range(0..OWNERS.len())];
                Item::captured(generate_media_id(), owner, now.saturating_sub(i as u64 * 1_000))
                    .with_liked(rng.random_bool(0.1))
                    .with_sponsored(rng.random_bool(0.1))
            })
            .collect();

        Ok(items)
    }

    async fn like_item(&self, id: &str) -> Result<(), ClientError> {
        self.act("like", id)
    }

    async fn comment_item(&self, id: &str, _text: &str) -> Result<(), ClientError> {
        self.act("comment", id)
    }
}
