//! Platform independent input identifiers delivered to scene callbacks.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// A physical key, as reported by key-down and key-up events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Letter and digit keys, reported in lower case.
    Character(char),
    Escape,
    Enter,
    Backspace,
    Tab,
    Space,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    Shift,
    Control,
    Alt,
    Super,
    Function(u8),
    /// Anything else, carrying the platform scancode.
    Other(u32),
}

impl Key {
    pub fn is_modifier(&self) -> bool {
        matches!(self, Key::Shift | Key::Control | Key::Alt | Key::Super)
    }
}
