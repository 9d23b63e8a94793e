//! The to-do widget, independent of any terminal or GUI toolkit.
//!
//! Front ends hit-test their own coordinates into a [`Target`], translate
//! keys into [`KeyPress`], and feed them here together with the current
//! time. All mutations of the list, and the store write that follows each
//! one, happen inside [`TodoWidget`].
//!
//! Single clicks on a label are deferred by the click delay so that the
//! first click of a double click never toggles: the double click opens an
//! edit session instead and cancels the pending toggle.

pub mod edit;
pub mod field;
pub mod keys;
pub mod pending;
pub mod target;

use std::time::Instant;

pub use edit::EditSession;
pub use field::TextField;
pub use keys::{Key, KeyPress, Modifiers};
pub use pending::PendingToggles;
pub use target::Target;

use crate::io::store::{self, Storage};
use crate::model::{Config, Filter, Item, ItemId, LabelConfig, TodoList};
use crate::ops::list_ops;

/// Where keyboard input goes when no edit session is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The new-entry input line
    Input,
    /// A list row
    Row(ItemId),
}

/// The widget state: list, filter, focus, pending toggles and the edit slot.
pub struct TodoWidget<S: Storage> {
    list: TodoList,
    storage: S,
    filter: Filter,
    labels: LabelConfig,
    focus: Focus,
    input: TextField,
    pending: PendingToggles,
    edit: Option<EditSession>,
    /// Payload last read from or written to storage
    last_payload: Option<String>,
    reload_deferred: bool,
    save_error: Option<String>,
}

impl<S: Storage> TodoWidget<S> {
    /// Load the list from `storage` and set up an idle widget.
    pub fn new(storage: S, config: &Config) -> Self {
        let list = store::load_list(&storage);
        let last_payload = storage.read();
        TodoWidget {
            list,
            storage,
            filter: Filter::All,
            labels: config.labels.clone(),
            focus: Focus::Input,
            input: TextField::new(),
            pending: PendingToggles::new(config.input.click_delay()),
            edit: None,
            last_payload,
            reload_deferred: false,
            save_error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn input(&self) -> &TextField {
        &self.input
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// The item with an open edit session, if any
    pub fn editing(&self) -> Option<ItemId> {
        self.edit.as_ref().map(|s| s.item)
    }

    pub fn is_pending(&self, id: ItemId) -> bool {
        self.pending.is_pending(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// When the next deferred toggle falls due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.next_deadline()
    }

    /// Message of the last failed store write, cleared by the next success
    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    pub fn visible_ids(&self) -> Vec<ItemId> {
        list_ops::visible_ids(&self.list, self.filter, self.editing())
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &Item> {
        let editing = self.editing();
        let filter = self.filter;
        self.list
            .iter()
            .filter(move |item| Some(item.id) == editing || filter.matches(item.done))
    }

    pub fn is_visible(&self, id: ItemId) -> bool {
        self.list
            .get(id)
            .is_some_and(|item| Some(id) == self.editing() || self.filter.matches(item.done))
    }

    /// Live-region text: active filter label and how many rows it shows.
    pub fn announcement(&self) -> String {
        let count = self.visible_items().count();
        format!(
            "{}: {} {}",
            self.filter.label(&self.labels),
            count,
            if count == 1 { "task" } else { "tasks" }
        )
    }

    pub fn labels(&self) -> &LabelConfig {
        &self.labels
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// A click with the given click count (1 for a single click, 2 for the
    /// second click of a double click, ...).
    pub fn click(&mut self, target: Target, count: u32, now: Instant) {
        if count > 1 {
            return;
        }

        if let Some(editing) = self.editing() {
            if target.item() == Some(editing) {
                return;
            }
            // Clicking anywhere else takes focus away from the field
            self.focus_lost();
            return;
        }

        if let Some(id) = target.item()
            && !self.list.contains(id)
        {
            return;
        }

        match target {
            Target::Label(id) => {
                self.focus = Focus::Row(id);
                self.pending.arm(id, now);
            }
            Target::Remove(id) => {
                self.focus = Focus::Row(id);
                self.delete(id);
            }
            Target::Row(id) => {
                self.focus = Focus::Row(id);
                self.toggle(id);
            }
            Target::NewInput => self.focus = Focus::Input,
            Target::EditField(_) | Target::Outside => {}
        }
    }

    /// A double click. Only a label opens an edit session.
    pub fn double_click(&mut self, target: Target) {
        if let Target::Label(id) = target {
            self.start_edit(id);
        }
    }

    /// Commit every deferred toggle that is due. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.pending
            .take_due(now)
            .into_iter()
            .filter(|id| self.toggle(*id))
            .count()
    }

    // -----------------------------------------------------------------------
    // Keyboard input
    // -----------------------------------------------------------------------

    /// Handle a key press. Returns false if the key meant nothing here.
    pub fn key(&mut self, press: KeyPress) -> bool {
        if self.edit.is_some() {
            return match press.key {
                Key::Enter | Key::Tab | Key::BackTab => {
                    self.focus_lost();
                    true
                }
                Key::Escape => {
                    self.cancel_edit();
                    true
                }
                _ => self
                    .edit
                    .as_mut()
                    .is_some_and(|session| session.field.handle_key(press)),
            };
        }

        match self.focus {
            Focus::Input => self.key_in_input(press),
            Focus::Row(id) => self.key_on_row(id, press),
        }
    }

    fn key_in_input(&mut self, press: KeyPress) -> bool {
        match press.key {
            Key::Enter => {
                self.submit();
                true
            }
            Key::Down | Key::Tab => match self.visible_ids().first() {
                Some(first) => {
                    self.focus = Focus::Row(*first);
                    true
                }
                None => false,
            },
            _ => self.input.handle_key(press),
        }
    }

    fn key_on_row(&mut self, id: ItemId, press: KeyPress) -> bool {
        if !self.list.contains(id) {
            self.settle_focus();
            return false;
        }
        if press.has_modifier() {
            return false;
        }

        match press.key {
            Key::Char(' ') | Key::Enter => self.toggle(id),
            Key::F(2) | Key::Char('e') | Key::Char('E') => self.start_edit(id),
            Key::Delete | Key::Backspace => self.delete(id),
            Key::Up => {
                let visible = self.visible_ids();
                let idx = visible.iter().position(|v| *v == id);
                self.focus = match idx {
                    Some(0) | None => Focus::Input,
                    Some(i) => Focus::Row(visible[i - 1]),
                };
                true
            }
            Key::Down => {
                let visible = self.visible_ids();
                let next = visible
                    .iter()
                    .position(|v| *v == id)
                    .and_then(|i| visible.get(i + 1));
                match next {
                    Some(next) => {
                        self.focus = Focus::Row(*next);
                        true
                    }
                    None => false,
                }
            }
            Key::Home | Key::End => {
                let visible = self.visible_ids();
                let pick = if press.key == Key::Home {
                    visible.first()
                } else {
                    visible.last()
                };
                if let Some(pick) = pick {
                    self.focus = Focus::Row(*pick);
                }
                true
            }
            Key::Tab | Key::BackTab => {
                self.focus = Focus::Input;
                true
            }
            _ => false,
        }
    }

    /// Pasted text goes to whichever field has focus.
    pub fn paste(&mut self, text: &str) {
        if let Some(session) = self.edit.as_mut() {
            session.field.insert_str(text);
        } else if self.focus == Focus::Input {
            self.input.insert_str(text);
        }
    }

    /// Focus the row at a 0-based display position among visible rows.
    pub fn focus_visible_row(&mut self, position: usize) {
        if self.edit.is_some() {
            return;
        }
        let visible = self.visible_ids();
        if let Some(id) = visible.get(position).or(visible.last()) {
            self.focus = Focus::Row(*id);
        }
    }

    // -----------------------------------------------------------------------
    // Routing
    // -----------------------------------------------------------------------

    /// Apply a route fragment such as `#/active`.
    pub fn set_route(&mut self, route: &str) {
        self.set_filter(Filter::from_route(route));
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.settle_focus();
    }

    // -----------------------------------------------------------------------
    // List operations
    // -----------------------------------------------------------------------

    /// Add the input line as a new item. The input is cleared and focused
    /// whether or not anything was added.
    pub fn submit(&mut self) -> Option<ItemId> {
        let text = self.input.text().to_string();
        self.input.clear();
        self.focus = Focus::Input;
        let id = list_ops::add_item(&mut self.list, &text).ok()?;
        self.persist();
        Some(id)
    }

    /// Flip `id`'s completion flag and persist. No-op for a missing item or
    /// the item being edited.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.editing() == Some(id) {
            return false;
        }
        if list_ops::toggle_item(&mut self.list, id).is_none() {
            return false;
        }
        self.persist();
        self.settle_focus();
        true
    }

    /// Remove `id`, cancelling its deferred toggle. If the row had focus,
    /// focus moves to the next visible row, else the previous, else the input.
    pub fn delete(&mut self, id: ItemId) -> bool {
        if self.editing() == Some(id) || !self.list.contains(id) {
            return false;
        }
        let neighbor = list_ops::neighbor_of(&self.visible_ids(), id);
        self.pending.cancel(id);
        list_ops::delete_item(&mut self.list, id);
        self.persist();
        if self.focus == Focus::Row(id) {
            self.focus = neighbor.map_or(Focus::Input, Focus::Row);
        }
        self.settle_focus();
        true
    }

    // -----------------------------------------------------------------------
    // Edit lifecycle
    // -----------------------------------------------------------------------

    /// Open an edit session on `id`. Refused while any session is open.
    pub fn start_edit(&mut self, id: ItemId) -> bool {
        if self.edit.is_some() {
            return false;
        }
        let Some(item) = self.list.get(id) else {
            return false;
        };
        let session = EditSession::start(id, &item.text);
        self.pending.cancel(id);
        self.edit = Some(session);
        self.focus = Focus::Row(id);
        true
    }

    /// The edit field lost focus: commit unless the session was cancelled.
    ///
    /// A store change that arrived during the edit is loaded first and the
    /// commit is applied to the same task in the new list. If that task is
    /// gone or its text changed underneath, the draft goes to the recovery
    /// log instead.
    pub fn focus_lost(&mut self) {
        let Some(session) = self.edit.take() else {
            return;
        };

        let mut target = Some(session.item);
        let mut position = self.list.position(session.item);
        if std::mem::take(&mut self.reload_deferred) {
            let raw = self.storage.read();
            if raw != self.last_payload {
                self.reload(raw);
                target = self.rebase_target(position, &session.previous);
                let draft = session.draft().trim();
                if target.is_none()
                    && !session.cancelled
                    && !draft.is_empty()
                    && draft != session.previous
                {
                    self.storage
                        .report_conflict("edit dropped: task changed by another process", draft);
                }
            }
        }

        match target {
            Some(id) => {
                if !session.cancelled
                    && list_ops::commit_text(&mut self.list, id, session.draft()).needs_persist()
                {
                    self.persist();
                }
                self.focus = Focus::Row(id);
                position = None;
            }
            None => self.focus = Focus::Input,
        }
        self.focus_position(position);
        self.settle_focus();
    }

    /// Abort the open edit. The previous text stays, nothing is written.
    pub fn cancel_edit(&mut self) {
        let Some(session) = self.edit.as_mut() else {
            return;
        };
        session.cancelled = true;
        // Closing the field moves focus back to the row
        self.focus_lost();
    }

    // -----------------------------------------------------------------------
    // Storage
    // -----------------------------------------------------------------------

    /// The store may have been changed by someone else. Reloads unless the
    /// payload is what this widget last saw. While an edit is open the reload
    /// waits for the session to close. Returns true if the list was replaced.
    pub fn external_change(&mut self) -> bool {
        if self.edit.is_some() {
            self.reload_deferred = true;
            return false;
        }
        let raw = self.storage.read();
        if raw == self.last_payload {
            return false;
        }

        let focused_pos = match self.focus {
            Focus::Row(id) => self.list.position(id),
            Focus::Input => None,
        };
        self.reload(raw);
        self.focus = Focus::Input;
        self.focus_position(focused_pos);
        self.settle_focus();
        true
    }

    /// Replace the list with what is stored now.
    fn reload(&mut self, raw: Option<String>) {
        self.list = store::load_list(&self.storage);
        self.last_payload = raw;
        // Ids are reassigned on load; nothing pending may outlive the old list
        self.pending.clear();
    }

    /// The task an open edit refers to after a reload: the one at the same
    /// position if its text is unchanged, else the first with that text.
    fn rebase_target(&self, position: Option<usize>, previous: &str) -> Option<ItemId> {
        position
            .and_then(|pos| self.list.at(pos))
            .filter(|item| item.text == previous)
            .or_else(|| self.list.iter().find(|item| item.text == previous))
            .map(|item| item.id)
    }

    /// Focus the row at full-list position `pos`, clamped to the last row.
    fn focus_position(&mut self, pos: Option<usize>) {
        let Some(pos) = pos else {
            return;
        };
        self.focus = self
            .list
            .len()
            .checked_sub(1)
            .and_then(|last| self.list.at(pos.min(last)))
            .map_or(Focus::Input, |item| Focus::Row(item.id));
    }

    /// Write the list. A stored payload this widget has not seen is about to
    /// be replaced, so it goes to the recovery log first.
    fn persist(&mut self) {
        let stored = self.storage.read();
        if stored != self.last_payload
            && let Some(overwritten) = stored.as_deref()
        {
            self.storage
                .report_conflict("overwrote a store written by another process", overwritten);
        }
        match store::save_list(&mut self.storage, &self.list) {
            Ok(payload) => {
                self.last_payload = Some(payload);
                self.save_error = None;
            }
            Err(e) => self.save_error = Some(e.to_string()),
        }
    }

    /// Keep focus off rows the filter hides: move to the nearest visible row
    /// after it, else before it, else the input.
    fn settle_focus(&mut self) {
        let Focus::Row(id) = self.focus else {
            return;
        };
        if self.is_visible(id) {
            return;
        }
        let visible = self.visible_ids();
        let items = self.list.items();
        let next = match self.list.position(id) {
            Some(pos) => items[pos + 1..]
                .iter()
                .map(|item| item.id)
                .find(|v| visible.contains(v))
                .or_else(|| {
                    items[..pos]
                        .iter()
                        .rev()
                        .map(|item| item.id)
                        .find(|v| visible.contains(v))
                }),
            None => visible.first().copied(),
        };
        self.focus = next.map_or(Focus::Input, Focus::Row);
    }
}
