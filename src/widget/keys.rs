/// A key, independent of the terminal library that reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Tab,
    BackTab,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        KeyPress {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(c: char) -> Self {
        KeyPress {
            key: Key::Char(c),
            modifiers: Modifiers {
                ctrl: true,
                alt: false,
            },
        }
    }

    pub fn has_modifier(&self) -> bool {
        self.modifiers.ctrl || self.modifiers.alt
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        KeyPress::plain(key)
    }
}

impl From<char> for KeyPress {
    fn from(c: char) -> Self {
        KeyPress::plain(Key::Char(c))
    }
}
