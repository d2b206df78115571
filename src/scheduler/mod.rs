//! Scheduler module for feed ingestion and paced engagement.
//!
//! This module provides:
//! - **Queue**: Deduplicated, freshest-first store of pending feed items.
//! - **Producer**: Periodic feed refresh with adaptive intervals.
//! - **Consumer**: One-at-a-time like-then-comment loop over the queue.
//! - **Executor**: Remote actions with randomized pacing and outcome classification.
//! - **Rate limiting**: Shared, growing cooldown when the service throttles the account.
//! - **Scheduler**: Composition root wiring all of the above to one session.
//!
//! # Architecture
//!
//! ```text
//! FeedClient --fetch--> FeedProducer --enqueue--> EngagementQueue
//!                           |                           |
//!                           +------ RateLimiter --------+
//!                                        |              v
//!                                 ActionExecutor <-- QueueConsumer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use engager::scheduler::Scheduler;
//!
//! let scheduler = Scheduler::new(config, client, codes)?;
//! scheduler.run().await?;
//! ```

use std::sync::{Mutex, MutexGuard};

pub mod consumer;
pub mod executor;
pub mod filter;
pub mod manager;
pub mod producer;
pub mod queue;
pub mod rate_limit;
pub mod stats;

pub use consumer::{ConsumerConfig, QueueConsumer};
pub use executor::{ActionExecutor, PacingConfig, choose_comment, jitter};
pub use filter::{DEFAULT_SEEN_CAPACITY, OwnerFilter, SeenIds};
pub use manager::Scheduler;
pub use producer::{FeedConfig, FeedProducer, ProducerState, next_interval};
pub use queue::EngagementQueue;
pub use rate_limit::{
    DEFAULT_BASE_COOLDOWN_SECS, DEFAULT_GROWTH_FACTOR, RateLimitConfig, RateLimiter,
    wait_for_clearance,
};
pub use stats::EngagementStats;

/// Lock shared scheduler state, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
