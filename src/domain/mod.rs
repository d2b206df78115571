//! Domain types for Engager
//!
//! This module contains the core domain types:
//! - Item: one piece of feed content eligible for engagement
//! - ActionOutcome: classified result of a like or comment call

pub mod item;
pub mod outcome;

pub use item::Item;
pub use outcome::{ActionKind, ActionOutcome};
