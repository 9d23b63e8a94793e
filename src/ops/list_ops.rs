use crate::model::{Filter, Item, ItemId, TodoList};

/// Error type for list operations addressed by position
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ListError {
    #[error("no task at position {0}")]
    IndexOutOfRange(usize),
    #[error("task text cannot be blank")]
    BlankText,
}

/// Outcome of committing edited text to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommit {
    /// The draft was blank; the item keeps its previous text
    Reverted,
    /// The draft equals the current text
    Unchanged,
    /// The text was replaced and needs persisting
    Changed,
}

impl TextCommit {
    pub fn needs_persist(self) -> bool {
        self == TextCommit::Changed
    }
}

/// Resolve a 1-based display position to an item id.
pub fn resolve_position(list: &TodoList, position: usize) -> Result<ItemId, ListError> {
    position
        .checked_sub(1)
        .and_then(|idx| list.at(idx))
        .map(|item| item.id)
        .ok_or(ListError::IndexOutOfRange(position))
}

/// Append a new, not-done item. Blank text is rejected.
pub fn add_item(list: &mut TodoList, text: &str) -> Result<ItemId, ListError> {
    list.push(text, false).ok_or(ListError::BlankText)
}

/// Flip an item's completion flag. Returns the new value, or `None` if the
/// item no longer exists.
pub fn toggle_item(list: &mut TodoList, id: ItemId) -> Option<bool> {
    let item = list.get_mut(id)?;
    item.done = !item.done;
    Some(item.done)
}

/// Apply an edit draft: blank reverts, equal is a no-op, anything else
/// replaces the trimmed text. Missing items are treated as reverted.
pub fn commit_text(list: &mut TodoList, id: ItemId, draft: &str) -> TextCommit {
    let next = draft.trim();
    let Some(item) = list.get_mut(id) else {
        return TextCommit::Reverted;
    };
    if next.is_empty() {
        TextCommit::Reverted
    } else if next == item.text {
        TextCommit::Unchanged
    } else {
        item.text = next.to_string();
        TextCommit::Changed
    }
}

pub fn delete_item(list: &mut TodoList, id: ItemId) -> Option<Item> {
    list.remove(id)
}

/// Ids of the rows a filter shows, in display order. `always_visible` (the
/// item being edited) is shown whatever its state.
pub fn visible_ids(list: &TodoList, filter: Filter, always_visible: Option<ItemId>) -> Vec<ItemId> {
    list.iter()
        .filter(|item| Some(item.id) == always_visible || filter.matches(item.done))
        .map(|item| item.id)
        .collect()
}

/// Which row should take focus once `id` leaves `visible`: the next row,
/// else the previous one, else none.
pub fn neighbor_of(visible: &[ItemId], id: ItemId) -> Option<ItemId> {
    let idx = visible.iter().position(|v| *v == id)?;
    visible
        .get(idx + 1)
        .or_else(|| idx.checked_sub(1).and_then(|prev| visible.get(prev)))
        .copied()
}

/// Item counts by state: (active, completed)
pub fn counts(list: &TodoList) -> (usize, usize) {
    let done = list.iter().filter(|item| item.done).count();
    (list.len() - done, done)
}
