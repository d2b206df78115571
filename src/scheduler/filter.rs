//! Feed filtering applied by the producer before items reach the queue.
//!
//! - Owner filtering from the allow/deny username lists
//! - A bounded memory of ids already handed to the queue this session

use std::collections::{HashSet, VecDeque};

use crate::domain::Item;

/// Ids remembered by default before the oldest are forgotten.
pub const DEFAULT_SEEN_CAPACITY: usize = 10_000;

fn normalize(username: &str) -> String {
    username.trim().trim_start_matches('@').to_lowercase()
}

/// Allow/deny filtering on the item owner.
///
/// An empty allow list admits everyone. The deny list always wins.
#[derive(Debug, Clone, Default)]
pub struct OwnerFilter {
    allow: HashSet<String>,
    deny: HashSet<String>,
}

impl OwnerFilter {
    pub fn new(allow: &[String], deny: &[String]) -> Self {
        Self {
            allow: allow.iter().map(|u| normalize(u)).collect(),
            deny: deny.iter().map(|u| normalize(u)).collect(),
        }
    }

    /// Whether the item's owner passes the lists.
    pub fn admits(&self, item: &Item) -> bool {
        let owner = normalize(&item.owner);
        if self.deny.contains(&owner) {
            return false;
        }
        self.allow.is_empty() || self.allow.contains(&owner)
    }
}

/// Fixed-capacity set of ids, oldest evicted first.
#[derive(Debug)]
pub struct SeenIds {
    capacity: usize,
    order: VecDeque<String>,
    ids: HashSet<String>,
}

impl Default for SeenIds {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SEEN_CAPACITY)
    }
}

impl SeenIds {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            ids: HashSet::new(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Remember an id. Returns false if it was already known.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.ids.remove(&oldest);
        }
        self.order.push_back(id.to_string());
        self.ids.insert(id.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
