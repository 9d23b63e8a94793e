use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of an item within one loaded list.
///
/// Ids are handed out by [`TodoList`](super::list::TodoList) and never reused,
/// so a stale id held by a timer or a focus slot simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    /// Trimmed, never empty
    pub text: String,
    pub done: bool,
}

impl Item {
    pub fn record(&self) -> ItemRecord {
        ItemRecord {
            text: self.text.clone(),
            done: self.done,
        }
    }
}

/// Persisted shape of an item: `{"text": "...", "done": false}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub text: String,
    pub done: bool,
}

impl ItemRecord {
    pub fn new(text: impl Into<String>, done: bool) -> Self {
        ItemRecord {
            text: text.into(),
            done,
        }
    }
}
