use std::fmt;

use easel_graphics::Key;

/// Identity of a native window, assigned by the backend.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NativeId(u64);

impl NativeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeId({})", self.0)
    }
}

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything a backend needs to create a window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowRequest {
    pub caption: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

/// A window event in backend-neutral form. Coordinates and sizes are
/// physical pixels of the client area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeEvent {
    Resized { width: u32, height: u32 },
    Click { x: i32, y: i32 },
    KeyDown(Key),
    KeyUp(Key),
    Char(char),
    /// The window contents must be drawn again.
    Expose,
    /// The user asked to close the window.
    CloseRequested,
    /// The native window is gone.
    Destroyed,
}
