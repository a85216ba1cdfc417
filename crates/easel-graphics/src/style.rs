//! Drawing state carried by every surface.

use crate::Color;

/// Outline state. A zero width pen draws nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pen {
    pub width: u32,
    pub color: Color,
}

impl Pen {
    pub const fn new(width: u32, color: Color) -> Self {
        Self { width, color }
    }

    pub const fn transparent() -> Self {
        Self {
            width: 0,
            color: Color::BLACK,
        }
    }

    pub const fn is_transparent(&self) -> bool {
        self.width == 0
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self::new(1, Color::BLACK)
    }
}

/// Fill state for closed shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Brush {
    #[default]
    Transparent,
    Solid(Color),
}

impl Brush {
    pub const fn solid(color: Color) -> Self {
        Brush::Solid(color)
    }

    pub const fn color(&self) -> Option<Color> {
        match self {
            Brush::Transparent => None,
            Brush::Solid(color) => Some(*color),
        }
    }
}

/// Requested text style; the family is resolved by the surface crate.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub family: String,
    pub color: Color,
}

impl FontSpec {
    pub const DEFAULT_SIZE: f32 = 18.0;
    pub const DEFAULT_FAMILY: &'static str = "monospace";

    pub fn new(size: f32, family: impl Into<String>, color: Color) -> Self {
        Self {
            size,
            family: family.into(),
            color,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_FAMILY, Color::BLACK)
    }
}
