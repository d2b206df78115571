//! Feed item record
//!
//! An Item is one piece of remote content that can be liked and commented on.
//! Items are produced by the feed refresh, owned by the engagement queue while
//! pending, and dropped once the consumer has engaged with them.

use crate::id::now_ms;
use serde::{Deserialize, Serialize};

/// A unit of engageable content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Remote media identifier, unique within a feed
    pub id: String,

    /// Username of the account that posted the item
    pub owner: String,

    /// When the item was captured, in milliseconds. Higher is fresher.
    pub captured_at: u64,

    /// Already liked by the authenticated account
    #[serde(default)]
    pub liked: bool,

    /// Sponsored content (ads are never engaged)
    #[serde(default)]
    pub sponsored: bool,
}

impl Item {
    /// Create an item captured now
    pub fn new(id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::captured(id, owner, now_ms())
    }

    /// Create an item with an explicit capture timestamp
    pub fn captured(id: impl Into<String>, owner: impl Into<String>, captured_at: u64) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            captured_at,
            liked: false,
            sponsored: false,
        }
    }

    /// Mark the item as already liked
    pub fn with_liked(mut self, liked: bool) -> Self {
        self.liked = liked;
        self
    }

    /// Mark the item as sponsored
    pub fn with_sponsored(mut self, sponsored: bool) -> Self {
        self.sponsored = sponsored;
        self
    }

    /// Returns true if the item can never be engaged
    pub fn is_ineligible(&self) -> bool {
        self.liked || self.sponsored
    }
}
