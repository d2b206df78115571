//! Session counters shared by the producer and the consumer.

use crate::domain::{ActionKind, ActionOutcome};

/// Running totals for one authenticated session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EngagementStats {
    /// Feed refreshes that returned a feed
    pub fetches: u64,
    /// Feed refreshes that failed
    pub fetch_failures: u64,
    /// Items that made it into the queue
    pub enqueued: u64,
    /// Items the consumer finished processing
    pub processed: u64,
    /// Items skipped because they were already liked
    pub skipped: u64,
    /// Items put back on the queue after a throttled like
    pub requeued: u64,
    /// Likes accepted
    pub liked: u64,
    /// Comments accepted
    pub commented: u64,
    /// Actions rejected for reasons other than throttling
    pub failed: u64,
    /// Rate-limit signals, from any source
    pub rate_limited: u64,
}

impl EngagementStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful feed refresh
    pub fn fetched(&mut self, added: usize) {
        self.fetches += 1;
        self.enqueued += added as u64;
    }

    /// Record a failed feed refresh
    pub fn fetch_failed(&mut self, rate_limited: bool) {
        self.fetch_failures += 1;
        if rate_limited {
            self.rate_limited += 1;
        }
    }

    /// Record the outcome of one like or comment
    pub fn action(&mut self, kind: ActionKind, outcome: &ActionOutcome) {
        match (kind, outcome) {
            (ActionKind::Like, ActionOutcome::Done) => self.liked += 1,
            (ActionKind::Comment, ActionOutcome::Done) => self.commented += 1,
            (_, ActionOutcome::RateLimited { .. }) => self.rate_limited += 1,
            (_, ActionOutcome::Failed(_)) => self.failed += 1,
        }
    }

    /// Record an item the consumer finished with
    pub fn processed(&mut self) {
        self.processed += 1;
    }

    /// Record an item dropped by the consumer without any action
    pub fn skipped(&mut self) {
        self.skipped += 1;
    }

    /// Record an item handed back to the queue for another pass
    pub fn requeued(&mut self) {
        self.requeued += 1;
    }
}
