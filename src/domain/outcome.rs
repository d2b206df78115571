//! Action outcome types.
//!
//! Every remote action is classified into one of these outcomes so the
//! consumer can decide what to do next without inspecting client errors.

use std::fmt;
use std::time::Duration;

/// The two remote actions an engagement is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Like,
    Comment,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Like => write!(f, "like"),
            ActionKind::Comment => write!(f, "comment"),
        }
    }
}

/// Outcome of one remote action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Action accepted and the post-action delay was served
    Done,
    /// Remote service throttled us; we already waited out the cooldown
    RateLimited { waited: Duration },
    /// Action rejected for another reason; the item is abandoned
    Failed(String),
}

impl ActionOutcome {
    /// Returns true if the action went through
    pub fn succeeded(&self) -> bool {
        matches!(self, ActionOutcome::Done)
    }
}
