//! Queue consumer: the single engagement loop.
//!
//! One item at a time, freshest first: like, then comment. The next item is
//! not dequeued until both actions (and their delays) are done, so at most one
//! remote action is ever in flight. An empty queue is polled, not awaited.
//!
//! A throttled like puts the item back on the queue once the cooldown is
//! over and skips its comment; the next pass likes and comments it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{ActionOutcome, Item};
use crate::error::Result;
use crate::scheduler::executor::{ActionExecutor, choose_comment};
use crate::scheduler::lock;
use crate::scheduler::queue::EngagementQueue;
use crate::scheduler::stats::EngagementStats;

/// Consumer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// How long to wait before polling an empty queue again (milliseconds).
    pub poll_interval_ms: u64,
    /// Still comment when the like failed or was throttled.
    pub comment_after_failed_like: bool,
    /// Log a stats summary after this many processed items (0 disables).
    pub stats_every: u64,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            comment_after_failed_like: true,
            stats_every: 10,
        }
    }
}

impl ConsumerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Drains the engagement queue.
pub struct QueueConsumer {
    queue: Arc<Mutex<EngagementQueue>>,
    executor: ActionExecutor,
    stats: Arc<Mutex<EngagementStats>>,
    comments: Vec<String>,
    config: ConsumerConfig,
}

impl QueueConsumer {
    pub fn new(
        queue: Arc<Mutex<EngagementQueue>>,
        executor: ActionExecutor,
        stats: Arc<Mutex<EngagementStats>>,
        comments: Vec<String>,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            queue,
            executor,
            stats,
            comments,
            config,
        }
    }

    /// Consume forever.
    pub async fn run(&self) {
        tracing::info!(comments = self.comments.len(), "Queue consumer started");
        loop {
            if !self.tick().await {
                tokio::time::sleep(self.config.poll_interval()).await;
            }
        }
    }

    /// Process at most one item. Returns false when the queue was empty.
    pub async fn tick(&self) -> bool {
        let next = lock(&self.queue).dequeue_next();
        let Some(item) = next else {
            return false;
        };

        if let Err(err) = self.engage(&item).await {
            if err.is_fatal() {
                tracing::error!(media_id = %item.id, error = %err, "Engagement aborted, moving on");
            } else {
                tracing::warn!(media_id = %item.id, error = %err, "Engagement aborted, moving on");
            }
        }

        let snapshot = {
            let mut stats = lock(&self.stats);
            stats.processed();
            stats.clone()
        };
        if self.config.stats_every > 0 && snapshot.processed % self.config.stats_every == 0 {
            tracing::info!(
                processed = snapshot.processed,
                liked = snapshot.liked,
                commented = snapshot.commented,
                failed = snapshot.failed,
                rate_limited = snapshot.rate_limited,
                "Engagement progress"
            );
        }

        true
    }

    /// Run the like-then-comment sequence on one item.
    pub async fn engage(&self, item: &Item) -> Result<()> {
        if item.liked {
            lock(&self.stats).skipped();
            tracing::debug!(media_id = %item.id, "Already liked, skipping");
            return Ok(());
        }

        let like = self.executor.like(item).await;
        if let ActionOutcome::RateLimited { waited } = like {
            if lock(&self.queue).enqueue(item.clone()) {
                lock(&self.stats).requeued();
            }
            tracing::info!(
                media_id = %item.id,
                waited_secs = waited.as_secs(),
                "Like throttled, item requeued"
            );
            return Ok(());
        }
        if !like.succeeded() && !self.config.comment_after_failed_like {
            tracing::info!(
                media_id = %item.id,
                outcome = ?like,
                "Like did not go through, not commenting"
            );
            return Ok(());
        }

        let text = choose_comment(&self.comments)?;
        self.executor.comment(item, text).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockCall;
    use crate::client::{ClientError, MockFeedClient};
    use crate::error::EngageError;
    use crate::scheduler::executor::PacingConfig;
    use crate::scheduler::rate_limit::RateLimiter;

    struct Harness {
        mock: Arc<MockFeedClient>,
        queue: Arc<Mutex<EngagementQueue>>,
        rate_limit: Arc<Mutex<RateLimiter>>,
        stats: Arc<Mutex<EngagementStats>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                mock: Arc::new(MockFeedClient::new()),
                queue: Arc::new(Mutex::new(EngagementQueue::new())),
                rate_limit: Arc::new(Mutex::new(RateLimiter::new(Duration::from_secs(60), 1.5))),
                stats: Arc::new(Mutex::new(EngagementStats::new())),
            }
        }

        fn consumer(&self, comments: &[&str], config: ConsumerConfig) -> QueueConsumer {
            let executor = ActionExecutor::new(
                self.mock.clone(),
                self.rate_limit.clone(),
                self.stats.clone(),
                PacingConfig::default(),
            );
            QueueConsumer::new(
                self.queue.clone(),
                executor,
                self.stats.clone(),
                comments.iter().map(|c| c.to_string()).collect(),
                config,
            )
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_like_then_comment_in_order() {
        let h = Harness::new();
        h.queue.lock().unwrap().enqueue(Item::captured("m1", "alice", 1));

        let consumer = h.consumer(&["Lovely!"], ConsumerConfig::default());
        assert!(consumer.tick().await);

        assert_eq!(
            h.mock.calls(),
            vec![
                MockCall::Like { id: "m1".into() },
                MockCall::Comment {
                    id: "m1".into(),
                    text: "Lovely!".into()
                },
            ]
        );
        assert!(h.queue.lock().unwrap().is_empty());
        let stats = h.stats.lock().unwrap();
        assert_eq!(stats.liked, 1);
        assert_eq!(stats.commented, 1);
        assert_eq!(stats.processed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_queue_tick_returns_false() {
        let h = Harness::new();
        let consumer = h.consumer(&["x"], ConsumerConfig::default());
        assert!(!consumer.tick().await);
        assert!(h.mock.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_like_still_comments_by_default() {
        let h = Harness::new();
        h.mock.push_like(Err(ClientError::Api("media unavailable".into())));
        h.queue.lock().unwrap().enqueue(Item::captured("m1", "alice", 1));

        let consumer = h.consumer(&["x"], ConsumerConfig::default());
        consumer.tick().await;

        assert_eq!(h.mock.liked_ids(), vec!["m1"]);
        assert_eq!(h.mock.commented_ids(), vec!["m1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_like_skips_comment_when_policy_off() {
        let h = Harness::new();
        h.mock.push_like(Err(ClientError::Api("media unavailable".into())));
        h.queue.lock().unwrap().enqueue(Item::captured("m1", "alice", 1));

        let config = ConsumerConfig {
            comment_after_failed_like: false,
            ..ConsumerConfig::default()
        };
        let consumer = h.consumer(&["x"], config);
        consumer.tick().await;

        assert_eq!(h.mock.liked_ids(), vec!["m1"]);
        assert!(h.mock.commented_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_like_requeues_item() {
        let h = Harness::new();
        h.mock.push_like(Err(ClientError::RateLimited("wait".into())));
        h.queue.lock().unwrap().enqueue(Item::captured("m1", "alice", 1));

        let consumer = h.consumer(&["x"], ConsumerConfig::default());
        let start = tokio::time::Instant::now();
        consumer.tick().await;

        // Cooldown of 60s served, no comment yet, item back for another pass
        assert!(start.elapsed() >= Duration::from_secs(60));
        assert!(h.mock.commented_ids().is_empty());
        assert!(h.queue.lock().unwrap().contains("m1"));
        {
            let stats = h.stats.lock().unwrap();
            assert_eq!(stats.rate_limited, 1);
            assert_eq!(stats.requeued, 1);
        }
        assert_eq!(h.rate_limit.lock().unwrap().trigger_count(), 1);

        // Second pass likes and comments, and the success resets the limiter
        consumer.tick().await;
        assert_eq!(h.mock.liked_ids(), vec!["m1", "m1"]);
        assert_eq!(h.mock.commented_ids(), vec!["m1"]);
        assert_eq!(h.stats.lock().unwrap().liked, 1);
        assert_eq!(h.rate_limit.lock().unwrap().trigger_count(), 0);
        assert!(h.queue.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_comment_not_retried() {
        let h = Harness::new();
        h.mock.push_comment(Err(ClientError::RateLimited("wait".into())));
        h.queue.lock().unwrap().enqueue(Item::captured("m1", "alice", 1));

        let consumer = h.consumer(&["x"], ConsumerConfig::default());
        consumer.tick().await;

        assert_eq!(h.mock.liked_ids(), vec!["m1"]);
        assert!(h.queue.lock().unwrap().is_empty());
        assert_eq!(h.stats.lock().unwrap().requeued, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_liked_item_skipped() {
        let h = Harness::new();
        let consumer = h.consumer(&["x"], ConsumerConfig::default());

        consumer
            .engage(&Item::captured("m1", "alice", 1).with_liked(true))
            .await
            .unwrap();

        assert!(h.mock.calls().is_empty());
        assert_eq!(h.stats.lock().unwrap().skipped, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_comment_pool_error_is_swallowed_by_tick() {
        let h = Harness::new();
        h.queue.lock().unwrap().enqueue(Item::captured("m1", "alice", 1));
        h.queue.lock().unwrap().enqueue(Item::captured("m2", "bob", 2));

        let consumer = h.consumer(&[], ConsumerConfig::default());
        let err = consumer.engage(&Item::captured("m0", "carol", 0)).await.unwrap_err();
        assert!(matches!(err, EngageError::ConfigValidation(_)));

        assert!(consumer.tick().await);
        assert!(consumer.tick().await);
        assert_eq!(h.mock.liked_ids(), vec!["m0", "m2", "m1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_drains_freshest_first() {
        let h = Harness::new();
        {
            let mut queue = h.queue.lock().unwrap();
            queue.enqueue(Item::captured("A", "x", 100));
            queue.enqueue(Item::captured("B", "x", 300));
            queue.enqueue(Item::captured("C", "x", 200));
        }

        let consumer = h.consumer(&["x"], ConsumerConfig::default());
        let _ = tokio::time::timeout(Duration::from_secs(3600), consumer.run()).await;

        assert_eq!(h.mock.liked_ids(), vec!["B", "C", "A"]);
        assert_eq!(h.mock.commented_ids(), vec!["B", "C", "A"]);
    }
}
