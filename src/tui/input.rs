use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::io::store::Storage;
use crate::model::Filter;
use crate::widget::{Focus, Key, KeyPress, Modifiers, Target};

use super::app::App;

/// Derives click counts from raw mouse-down events.
///
/// A press counts as a repeat of the previous one when it lands on the same
/// target within the window.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(Target, Instant, u32)>,
}

impl ClickTracker {
    pub fn new(window: Duration) -> Self {
        ClickTracker { window, last: None }
    }

    /// Record a press and return its click count (1, 2, 3, ...).
    pub fn register(&mut self, target: Target, now: Instant) -> u32 {
        let count = match self.last {
            Some((last_target, at, count))
                if last_target == target && now.saturating_duration_since(at) <= self.window =>
            {
                count + 1
            }
            _ => 1,
        };
        self.last = Some((target, now, count));
        count
    }
}

/// Translate a crossterm key into the widget's key type.
pub fn translate_key(key: KeyEvent) -> Option<KeyPress> {
    let code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(KeyPress {
        key: code,
        modifiers: Modifiers {
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            alt: key.modifiers.contains(KeyModifiers::ALT),
        },
    })
}

/// Handle a key event
pub fn handle_key<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        app.quit();
        return;
    }
    let Some(press) = translate_key(key) else {
        return;
    };

    // App-level keys only apply on the list, where they are not text input
    let on_list = app.widget.editing().is_none() && matches!(app.widget.focus(), Focus::Row(_));
    if on_list && !press.has_modifier() {
        match press.key {
            Key::Char('q') => {
                app.quit();
                return;
            }
            Key::Char(c @ '1'..='3') => {
                let idx = c as usize - '1' as usize;
                app.widget.set_filter(Filter::ALL[idx]);
                return;
            }
            _ => {}
        }
    }

    app.widget.key(press);
}

/// Handle a mouse event
pub fn handle_mouse<S: Storage>(app: &mut App<S>, mouse: MouseEvent, now: Instant) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }

    if let Some(filter) = app.layout.filter_at(mouse.column, mouse.row) {
        app.widget.focus_lost();
        app.widget.set_filter(filter);
        return;
    }

    let target = app.layout.classify(mouse.column, mouse.row);
    let count = app.clicks.register(target, now);
    app.widget.click(target, count, now);
    if count == 2 {
        app.widget.double_click(target);
    }
}
