//! Feed producer: periodic feed refresh feeding the engagement queue.
//!
//! Every tick fetches the feed, whatever the queue holds. Instead of skipping
//! fetches when the queue is busy, the next interval is stretched, so ingestion
//! never stalls behind a slow consumer:
//!
//! - queue at or above the saturation mark: `2 × base`
//! - nothing new added: `1.5 × base`
//! - a full batch or more added: `base / 2`
//! - otherwise: `base`
//!
//! No fetch is made while the shared RateLimiter holds a pause, whoever raised
//! it. A throttled fetch triggers the RateLimiter, which pauses the consumer
//! too, and the producer waits the cooldown before its next tick. Any other
//! fetch failure is logged and the next tick comes after the base interval.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::FeedClient;
use crate::domain::Item;
use crate::scheduler::filter::{OwnerFilter, SeenIds};
use crate::scheduler::lock;
use crate::scheduler::queue::EngagementQueue;
use crate::scheduler::rate_limit::{RateLimiter, wait_for_clearance};
use crate::scheduler::stats::EngagementStats;

/// Feed refresh configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Base interval between refreshes (seconds).
    pub refresh_interval_secs: u64,
    /// New items per refresh considered a busy feed.
    pub target_batch_size: usize,
    /// Queue length at which refreshes slow down.
    pub saturation_mark: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5 * 60,
            target_batch_size: 10,
            saturation_mark: 50,
        }
    }
}

impl FeedConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Pick the wait before the next refresh.
pub fn next_interval(config: &FeedConfig, added: usize, queue_len: usize) -> Duration {
    let base = config.refresh_interval();
    if queue_len >= config.saturation_mark {
        base * 2
    } else if added == 0 {
        base.mul_f64(1.5)
    } else if added >= config.target_batch_size {
        base / 2
    } else {
        base
    }
}

/// Producer state between and during ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    Idle,
    Refreshing,
}

/// Periodically pulls the feed into the queue.
pub struct FeedProducer {
    client: Arc<dyn FeedClient>,
    queue: Arc<Mutex<EngagementQueue>>,
    rate_limit: Arc<Mutex<RateLimiter>>,
    stats: Arc<Mutex<EngagementStats>>,
    config: FeedConfig,
    owners: OwnerFilter,
    seen: SeenIds,
    state: ProducerState,
}

impl FeedProducer {
    pub fn new(
        client: Arc<dyn FeedClient>,
        queue: Arc<Mutex<EngagementQueue>>,
        rate_limit: Arc<Mutex<RateLimiter>>,
        stats: Arc<Mutex<EngagementStats>>,
        config: FeedConfig,
    ) -> Self {
        Self {
            client,
            queue,
            rate_limit,
            stats,
            config,
            owners: OwnerFilter::default(),
            seen: SeenIds::default(),
            state: ProducerState::Idle,
        }
    }

    /// Restrict ingestion by item owner.
    pub fn with_owner_filter(mut self, owners: OwnerFilter) -> Self {
        self.owners = owners;
        self
    }

    pub fn state(&self) -> ProducerState {
        self.state
    }

    /// Run refresh ticks forever.
    pub async fn run(&mut self) {
        tracing::info!(
            base_interval_secs = self.config.refresh_interval_secs,
            "Feed producer started"
        );
        loop {
            let wait = self.refresh().await;
            let offset =
                chrono::Duration::from_std(wait).unwrap_or_else(|_| chrono::Duration::zero());
            let next_at = chrono::Local::now() + offset;
            tracing::debug!(
                wait_secs = wait.as_secs(),
                next_refresh = %next_at.format("%H:%M:%S"),
                "Next feed refresh scheduled"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Perform one refresh tick and return the wait before the next one.
    pub async fn refresh(&mut self) -> Duration {
        let paused = wait_for_clearance(&self.rate_limit).await;
        if !paused.is_zero() {
            tracing::info!(paused_secs = paused.as_secs(), "Feed refresh resumed after cooldown");
        }

        self.state = ProducerState::Refreshing;
        let result = self.client.fetch_feed_items().await;

        let wait = match result {
            Ok(items) => {
                let fetched = items.len();
                let added = self.ingest(items);
                let queue_len = lock(&self.queue).len();
                lock(&self.stats).fetched(added);
                tracing::info!(fetched, added, queue_len, "Feed refreshed");
                next_interval(&self.config, added, queue_len)
            }
            Err(err) if err.is_rate_limit() => {
                lock(&self.stats).fetch_failed(true);
                let cooldown = lock(&self.rate_limit).trigger();
                tracing::warn!(
                    error = %err,
                    cooldown_secs = cooldown.as_secs(),
                    "Feed refresh throttled, pausing all actions"
                );
                cooldown
            }
            Err(err) => {
                lock(&self.stats).fetch_failed(false);
                tracing::warn!(error = %err, "Feed refresh failed, retrying at normal interval");
                self.config.refresh_interval()
            }
        };

        self.state = ProducerState::Idle;
        wait
    }

    /// Filter fetched items and enqueue the survivors. Returns how many were added.
    fn ingest(&mut self, items: Vec<Item>) -> usize {
        let mut queue = lock(&self.queue);
        let mut added = 0;

        for item in items {
            if item.is_ineligible() || !self.owners.admits(&item) || self.seen.contains(&item.id) {
                continue;
            }
            let id = item.id.clone();
            if queue.enqueue(item) {
                self.seen.insert(&id);
                added += 1;
            }
        }

        added
    }
}
