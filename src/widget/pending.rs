use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::model::ItemId;

/// Deferred toggles armed by single clicks on a label, keyed by item.
///
/// At most one entry exists per item. Entries are kept in the order they
/// were armed, so toggles that fall due together commit in click order.
#[derive(Debug, Clone)]
pub struct PendingToggles {
    delay: Duration,
    deadlines: IndexMap<ItemId, Instant>,
}

impl PendingToggles {
    pub fn new(delay: Duration) -> Self {
        PendingToggles {
            delay,
            deadlines: IndexMap::new(),
        }
    }

    /// Arm the toggle for `id`, replacing (restarting) any existing one.
    pub fn arm(&mut self, id: ItemId, now: Instant) {
        // Restarting moves the entry to the back so ordering follows the latest click
        self.deadlines.shift_remove(&id);
        self.deadlines.insert(id, now + self.delay);
    }

    /// Cancel the toggle for `id`. Returns true if one was pending.
    pub fn cancel(&mut self, id: ItemId) -> bool {
        self.deadlines.shift_remove(&id).is_some()
    }

    pub fn is_pending(&self, id: ItemId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Remove and return every entry whose deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Vec<ItemId> {
        let due: Vec<ItemId> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &due {
            self.deadlines.shift_remove(id);
        }
        due
    }

    /// Earliest deadline, for sizing the event loop's poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
