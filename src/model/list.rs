use super::item::{Item, ItemId, ItemRecord};

/// The ordered, append-only collection of items.
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<Item>,
    next_id: u64,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from persisted records. Records whose trimmed text is
    /// empty are skipped.
    pub fn from_records(records: impl IntoIterator<Item = ItemRecord>) -> Self {
        let mut list = TodoList::new();
        for record in records {
            list.push(&record.text, record.done);
        }
        list
    }

    /// Append an item. Returns `None` (and appends nothing) for blank text.
    pub fn push(&mut self, text: &str, done: bool) -> Option<ItemId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(Item {
            id,
            text: text.to_string(),
            done,
        });
        Some(id)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.position(id)?;
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Item at a 0-based display index
    pub fn at(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of every item in display order, ready to persist.
    pub fn records(&self) -> Vec<ItemRecord> {
        self.items.iter().map(Item::record).collect()
    }
}
