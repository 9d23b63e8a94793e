//! Screen geometry shared by rendering and mouse hit-testing.
//!
//! The layout is rebuilt on every frame from the widget state and kept on the
//! app, so a mouse event is always classified against what is on screen.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::io::store::Storage;
use crate::model::{Filter, ItemId};
use crate::util::unicode::display_width;
use crate::widget::{Focus, Target, TodoWidget};

/// Cells taken by the checkbox column: `  [x] `
pub const CHECKBOX_WIDTH: u16 = 6;
/// Cells taken by the remove control at the end of a row: ` ✕ `
pub const REMOVE_WIDTH: u16 = 3;
/// Prompt in front of the new-entry input
pub const INPUT_PROMPT: &str = " \u{276F} ";

/// Regions of the screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Areas {
    pub filter_bar: Rect,
    pub input: Rect,
    pub separator: Rect,
    pub list: Rect,
    pub status: Rect,
}

/// Split the terminal: filter bar | input | separator | list | status row
pub fn split(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
    Areas {
        filter_bar: chunks[0],
        input: chunks[1],
        separator: chunks[2],
        list: chunks[3],
        status: chunks[4],
    }
}

/// One clickable filter tab in the filter bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTab {
    pub filter: Filter,
    pub text: String,
    pub x: u16,
    pub width: u16,
}

/// A list row on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlot {
    pub id: ItemId,
    pub y: u16,
    /// First column after the (possibly truncated) label
    pub label_end: u16,
    pub editing: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListLayout {
    pub areas: Areas,
    pub tabs: Vec<FilterTab>,
    pub rows: Vec<RowSlot>,
    /// Index of the first visible row shown
    pub scroll: usize,
    /// Visible rows that did not fit on screen
    pub hidden_below: usize,
}

impl ListLayout {
    /// Lay out `widget` in `area`, scrolling from `scroll` just enough to keep
    /// the focused row on screen.
    pub fn build<S: Storage>(area: Rect, widget: &TodoWidget<S>, scroll: usize) -> Self {
        let areas = split(area);
        let list = areas.list;

        let mut tabs = Vec::new();
        let mut x = areas.filter_bar.x + 1;
        for (n, filter) in Filter::ALL.into_iter().enumerate() {
            let text = format!("[{}] {}", n + 1, filter.label(widget.labels()));
            let width = display_width(&text) as u16;
            tabs.push(FilterTab {
                filter,
                text,
                x,
                width,
            });
            x = x.saturating_add(width + 2);
        }

        let items: Vec<_> = widget.visible_items().collect();
        let height = list.height as usize;
        let focused = match widget.focus() {
            Focus::Row(id) => items.iter().position(|item| item.id == id),
            Focus::Input => None,
        };
        let scroll = keep_in_view(scroll, focused, height, items.len());

        let label_x = list.x + CHECKBOX_WIDTH;
        let room = list.width.saturating_sub(CHECKBOX_WIDTH + REMOVE_WIDTH) as usize;
        let editing = widget.editing();
        let rows: Vec<RowSlot> = items
            .iter()
            .skip(scroll)
            .take(height)
            .enumerate()
            .map(|(i, item)| RowSlot {
                id: item.id,
                y: list.y + i as u16,
                label_end: label_x + display_width(&item.text).min(room) as u16,
                editing: Some(item.id) == editing,
            })
            .collect();
        let hidden_below = items.len().saturating_sub(scroll + rows.len());

        ListLayout {
            areas,
            tabs,
            rows,
            scroll,
            hidden_below,
        }
    }

    /// Hit-test a terminal cell against the widget's parts.
    pub fn classify(&self, col: u16, row: u16) -> Target {
        if contains(self.areas.input, col, row) {
            return Target::NewInput;
        }
        let list = self.areas.list;
        if !contains(list, col, row) {
            return Target::Outside;
        }
        let Some(slot) = self.rows.iter().find(|slot| slot.y == row) else {
            return Target::Outside;
        };

        let label_x = list.x + CHECKBOX_WIDTH;
        if slot.editing {
            // The edit field replaces both label and remove control
            return if col >= label_x {
                Target::EditField(slot.id)
            } else {
                Target::Row(slot.id)
            };
        }
        if col >= list.right().saturating_sub(REMOVE_WIDTH) {
            Target::Remove(slot.id)
        } else if col >= label_x && col < slot.label_end {
            Target::Label(slot.id)
        } else {
            Target::Row(slot.id)
        }
    }

    /// The filter tab under a cell, if any
    pub fn filter_at(&self, col: u16, row: u16) -> Option<Filter> {
        if row != self.areas.filter_bar.y {
            return None;
        }
        self.tabs
            .iter()
            .find(|tab| col >= tab.x && col < tab.x + tab.width)
            .map(|tab| tab.filter)
    }
}

fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Adjust a scroll offset so that `focused` (if any) is within the window.
fn keep_in_view(scroll: usize, focused: Option<usize>, height: usize, len: usize) -> usize {
    if height == 0 {
        return 0;
    }
    let max = len.saturating_sub(height);
    let scroll = match focused {
        Some(idx) if idx < scroll => idx,
        Some(idx) if idx >= scroll + height => idx + 1 - height,
        _ => scroll,
    };
    scroll.min(max)
}
