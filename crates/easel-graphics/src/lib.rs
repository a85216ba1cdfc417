//! Pure data for drawing in Easel
//!
//! This crate contains the color, geometry, drawing-state and input types
//! shared by the surface, runtime and platform crates.

mod angle;
mod color;
mod geometry;
mod input;
mod style;

pub use angle::*;
pub use color::*;
pub use geometry::*;
pub use input::*;
pub use style::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::input::{Key, MouseButton};
    pub use crate::style::{Brush, FontSpec, Pen};
}
