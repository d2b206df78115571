//! Engagement queue: deduplicated, freshest-first holding area for feed items.
//!
//! Items are keyed by id, so inserting an id that is already queued is a
//! no-op. Removal always takes the most recently captured item. Equal capture
//! times are resolved in insertion order, first in wins.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::domain::Item;

/// Ordering key: capture time, then reversed insertion sequence so that
/// `pop_last` prefers the earliest insert among equal timestamps.
type OrderKey = (u64, Reverse<u64>);

/// Ordered set of pending items.
#[derive(Debug, Default)]
pub struct EngagementQueue {
    ordered: BTreeMap<OrderKey, Item>,
    index: HashMap<String, OrderKey>,
    next_seq: u64,
}

impl EngagementQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item.
    ///
    /// Liked items, sponsored items and ids already queued are dropped
    /// silently. Returns true if the queue grew.
    pub fn enqueue(&mut self, item: Item) -> bool {
        if item.is_ineligible() || self.index.contains_key(&item.id) {
            return false;
        }

        let key = (item.captured_at, Reverse(self.next_seq));
        self.next_seq += 1;
        self.index.insert(item.id.clone(), key);
        self.ordered.insert(key, item);
        true
    }

    /// Remove and return the freshest item.
    pub fn dequeue_next(&mut self) -> Option<Item> {
        let (_, item) = self.ordered.pop_last()?;
        self.index.remove(&item.id);
        Some(item)
    }

    /// Remove a specific item by id. No-op if it is not queued.
    pub fn remove(&mut self, id: &str) -> Option<Item> {
        let key = self.index.remove(id)?;
        self.ordered.remove(&key)
    }

    /// Whether an item with this id is queued.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, ts: u64) -> Item {
        Item::captured(id, "owner", ts)
    }

    #[test]
    fn test_dequeue_freshest_first() {
        let mut queue = EngagementQueue::new();
        queue.enqueue(item("A", 100));
        queue.enqueue(item("B", 300));
        queue.enqueue(item("C", 200));

        assert_eq!(queue.dequeue_next().unwrap().id, "B");
        assert_eq!(queue.dequeue_next().unwrap().id, "C");
        assert_eq!(queue.dequeue_next().unwrap().id, "A");
        assert!(queue.dequeue_next().is_none());
    }

    #[test]
    fn test_duplicate_id_is_noop() {
        let mut queue = EngagementQueue::new();
        assert!(queue.enqueue(item("A", 100)));
        assert!(!queue.enqueue(item("A", 500)));
        assert_eq!(queue.len(), 1);
        // First entry kept, not replaced
        assert_eq!(queue.dequeue_next().unwrap().captured_at, 100);
    }

    #[test]
    fn test_liked_and_sponsored_dropped() {
        let mut queue = EngagementQueue::new();
        assert!(!queue.enqueue(item("X", 1).with_liked(true)));
        assert!(!queue.enqueue(item("Y", 2).with_sponsored(true)));
        assert!(queue.enqueue(item("Z", 3)));
        assert_eq!(queue.len(), 1);
        assert!(queue.contains("Z"));
        assert!(!queue.contains("X"));
        assert!(!queue.contains("Y"));
    }

    #[test]
    fn test_ties_go_to_first_inserted() {
        let mut queue = EngagementQueue::new();
        queue.enqueue(item("first", 50));
        queue.enqueue(item("second", 50));
        queue.enqueue(item("third", 50));

        assert_eq!(queue.dequeue_next().unwrap().id, "first");
        assert_eq!(queue.dequeue_next().unwrap().id, "second");
        assert_eq!(queue.dequeue_next().unwrap().id, "third");
    }

    #[test]
    fn test_remove_specific_item() {
        let mut queue = EngagementQueue::new();
        queue.enqueue(item("A", 1));
        queue.enqueue(item("B", 2));

        assert_eq!(queue.remove("B").unwrap().id, "B");
        assert!(queue.remove("B").is_none());
        assert!(queue.remove("missing").is_none());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue_next().unwrap().id, "A");
    }

    #[test]
    fn test_dequeued_id_can_be_requeued() {
        let mut queue = EngagementQueue::new();
        queue.enqueue(item("A", 1));
        queue.dequeue_next();
        assert!(queue.enqueue(item("A", 1)));
    }

    #[test]
    fn test_never_holds_duplicate_ids() {
        let mut queue = EngagementQueue::new();
        let ids = ["a", "b", "a", "c", "b", "a", "d", "c"];
        for (ts, id) in ids.iter().enumerate() {
            queue.enqueue(item(id, ts as u64));
        }
        assert_eq!(queue.len(), 4);

        let mut seen = Vec::new();
        while let Some(next) = queue.dequeue_next() {
            assert!(!seen.contains(&next.id));
            seen.push(next.id);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = EngagementQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert!(queue.dequeue_next().is_none());
    }
}
