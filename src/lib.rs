//! Engager - paced, rate-limit aware feed engagement
//!
//! Engager pulls a social feed into a freshest-first queue and works through it
//! one item at a time, liking and commenting with randomized delays and backing
//! off whenever the service signals throttling.

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod id;
pub mod scheduler;
pub mod session;

pub use error::{EngageError, Result};
