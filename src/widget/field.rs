use crate::util::unicode;

use super::keys::{Key, KeyPress};

/// A single-line text field with a caret and an optional selection.
/// Offsets are byte offsets that always sit on grapheme boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
    anchor: Option<usize>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field holding `text` with all of it selected and the caret at the end
    pub fn with_text_selected(text: &str) -> Self {
        let mut field = TextField {
            text: text.to_string(),
            cursor: text.len(),
            anchor: None,
        };
        field.select_all();
        field
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The selected byte range, if non-empty
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        let (start, end) = if anchor <= self.cursor {
            (anchor, self.cursor)
        } else {
            (self.cursor, anchor)
        };
        (start != end).then_some((start, end))
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.anchor = None;
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.text.len();
    }

    /// Insert text at the caret, replacing the selection. Line breaks become spaces.
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        let clean: String = s
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.text.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some((start, _)) = self.selection() {
            self.cursor = start;
        } else if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
        self.anchor = None;
    }

    pub fn move_right(&mut self) {
        if let Some((_, end)) = self.selection() {
            self.cursor = end;
        } else if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
        self.anchor = None;
    }

    pub fn home(&mut self) {
        self.cursor = 0;
        self.anchor = None;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
        self.anchor = None;
    }

    /// Apply a text-editing key. Returns false for keys the field does not
    /// handle (Enter, Escape, navigation between widgets, ...).
    pub fn handle_key(&mut self, press: KeyPress) -> bool {
        match press.key {
            Key::Char('a') if press.modifiers.ctrl => self.select_all(),
            Key::Char('u') if press.modifiers.ctrl => self.clear(),
            Key::Char(c) if !press.has_modifier() => self.insert_char(c),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_forward(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Home => self.home(),
            Key::End => self.end(),
            _ => return false,
        }
        true
    }

    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        self.text.replace_range(start..end, "");
        self.cursor = start;
        self.anchor = None;
        true
    }
}
