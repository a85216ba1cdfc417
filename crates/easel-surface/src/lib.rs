//! Off-screen drawing surfaces for Easel.
//!
//! A [`Canvas`] keeps two synchronized planes: a color plane holding what
//! was drawn and a mask plane recording where something was drawn. Every
//! primitive writes both, which lets [`Canvas::composite`] punch and fill
//! irregular holes in a destination without an alpha channel.
//!
//! [`Surface`] wraps a canvas in a shareable handle with a position and an
//! ordered list of non-owning children; [`composite_tree`] walks that tree.

mod canvas;
mod compositor;
mod error;
mod export;
mod images;
mod pixmap;
mod raster;
mod surface;
mod text;

pub use canvas::{Canvas, BACKDROP, MAX_DIMENSION, TOUCHED, UNTOUCHED};
pub use compositor::composite_tree;
pub use error::{DrawError, ExportError, FontError, ImageError, SurfaceCreationError};
pub use export::ImageFormat;
pub use images::Image;
pub use pixmap::Pixmap;
pub use surface::{Surface, WeakSurface};
pub use text::{font_book, register_font, FontBook};

pub use easel_graphics::{Brush, Color, FontSpec, Pen, Point, Rect, Size};
