//! Scheduler: composition root for one engagement session.
//!
//! The Scheduler owns the shared state (queue, rate limiter, stats), logs in,
//! then drives the feed producer and the queue consumer side by side:
//! 1. Session authenticates, answering challenges through the code hook
//! 2. FeedProducer refreshes the feed into the queue on its own ticks
//! 3. QueueConsumer drains the queue one item at a time
//!
//! Both loops live in the same task and only touch shared state between
//! suspension points, so no lock is held across an await.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::client::FeedClient;
use crate::config::Config;
use crate::error::Result;
use crate::scheduler::consumer::QueueConsumer;
use crate::scheduler::executor::ActionExecutor;
use crate::scheduler::filter::OwnerFilter;
use crate::scheduler::producer::FeedProducer;
use crate::scheduler::queue::EngagementQueue;
use crate::scheduler::rate_limit::RateLimiter;
use crate::scheduler::stats::EngagementStats;
use crate::session::{SecurityCodeProvider, Session, SessionEvent};

/// Owns and runs one engagement session.
pub struct Scheduler {
    config: Config,
    client: Arc<dyn FeedClient>,
    codes: Arc<dyn SecurityCodeProvider>,
    queue: Arc<Mutex<EngagementQueue>>,
    rate_limit: Arc<Mutex<RateLimiter>>,
    stats: Arc<Mutex<EngagementStats>>,
    events: Option<mpsc::Sender<SessionEvent>>,
}

impl Scheduler {
    /// Validate the config and build the shared state.
    pub fn new(
        config: Config,
        client: Arc<dyn FeedClient>,
        codes: Arc<dyn SecurityCodeProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let rate_limit = RateLimiter::from_config(&config.rate_limit);
        Ok(Self {
            config,
            client,
            codes,
            queue: Arc::new(Mutex::new(EngagementQueue::new())),
            rate_limit: Arc::new(Mutex::new(rate_limit)),
            stats: Arc::new(Mutex::new(EngagementStats::new())),
            events: None,
        })
    }

    /// Forward session lifecycle events to this channel.
    pub fn with_events(mut self, events: mpsc::Sender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the shared queue.
    pub fn queue(&self) -> Arc<Mutex<EngagementQueue>> {
        self.queue.clone()
    }

    /// Get a reference to the shared rate limit state.
    pub fn rate_limit(&self) -> Arc<Mutex<RateLimiter>> {
        self.rate_limit.clone()
    }

    /// Get a reference to the session counters.
    pub fn stats(&self) -> Arc<Mutex<EngagementStats>> {
        self.stats.clone()
    }

    /// Log in and engage until the process exits.
    ///
    /// Only returns on a fatal authentication error.
    pub async fn run(&self) -> Result<()> {
        let mut session = Session::new(self.client.clone(), self.codes.clone())
            .with_max_challenge_attempts(self.config.session.max_challenge_attempts);
        if let Some(events) = &self.events {
            session = session.with_events(events.clone());
        }

        session.authenticate(&self.config.username, &self.config.password).await?;

        let mut producer = self.producer();
        let consumer = self.consumer();
        tokio::join!(producer.run(), consumer.run());

        Ok(())
    }

    fn producer(&self) -> FeedProducer {
        FeedProducer::new(
            self.client.clone(),
            self.queue.clone(),
            self.rate_limit.clone(),
            self.stats.clone(),
            self.config.feed.clone(),
        )
        .with_owner_filter(OwnerFilter::new(&self.config.allow_users, &self.config.deny_users))
    }

    fn consumer(&self) -> QueueConsumer {
        let executor = ActionExecutor::new(
            self.client.clone(),
            self.rate_limit.clone(),
            self.stats.clone(),
            self.config.pacing.clone(),
        );
        QueueConsumer::new(
            self.queue.clone(),
            executor,
            self.stats.clone(),
            self.config.comments.clone(),
            self.config.consumer.clone(),
        )
    }
}
