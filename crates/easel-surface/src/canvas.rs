use std::fmt;

use easel_graphics::{Brush, Color, Pen, Rect, Size};

use crate::error::SurfaceCreationError;
use crate::pixmap::Pixmap;
use crate::text::FontState;

/// Mask value for a pixel that has been drawn to.
pub const TOUCHED: u8 = 0x00;
/// Mask value for a pixel nothing has been drawn to.
pub const UNTOUCHED: u8 = 0xFF;
/// Color plane value of an untouched pixel. Drawn pixels are always opaque.
pub const BACKDROP: [u8; 4] = [255, 255, 255, 0];
/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 16_384;

/// A fixed-size drawing target with a color plane and a mask plane.
pub struct Canvas {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    mask: Vec<u8>,
    pub(crate) pen: Pen,
    pub(crate) brush: Brush,
    pub(crate) font: FontState,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceCreationError> {
        if width == 0 || height == 0 {
            return Err(SurfaceCreationError::Empty { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(SurfaceCreationError::TooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }
        let len = Size::new(width, height)
            .area()
            .ok_or(SurfaceCreationError::Allocation { width, height })?;
        let color = allocate(len, BACKDROP).ok_or(SurfaceCreationError::Allocation { width, height })?;
        let mask = allocate(len, UNTOUCHED).ok_or(SurfaceCreationError::Allocation { width, height })?;
        Ok(Self {
            width,
            height,
            color,
            mask,
            pen: Pen::default(),
            brush: Brush::default(),
            font: FontState::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Sets the outline pen. Widths above [`MAX_DIMENSION`] are clamped.
    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = Pen::new(pen.width.min(MAX_DIMENSION), pen.color);
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    /// Color plane value at `(x, y)`.
    pub fn color_at(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.index(x, y).map(|idx| self.color[idx])
    }

    /// Mask plane value at `(x, y)`.
    pub fn mask_at(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|idx| self.mask[idx])
    }

    pub fn is_touched(&self, x: i32, y: i32) -> bool {
        self.mask_at(x, y) == Some(TOUCHED)
    }

    /// Number of pixels marked in the mask plane.
    pub fn touched_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m == TOUCHED).count()
    }

    /// Writes one pixel on both planes. Out-of-bounds writes are clipped.
    pub(crate) fn touch(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.color[idx] = color.to_rgba();
            self.mask[idx] = TOUCHED;
        }
    }

    /// Resets both planes to untouched. Drawing state is kept.
    pub fn clear(&mut self) {
        self.color.fill(BACKDROP);
        self.mask.fill(UNTOUCHED);
    }

    /// Paints every pixel opaque with `color`.
    pub fn fill(&mut self, color: Color) {
        self.color.fill(color.to_rgba());
        self.mask.fill(TOUCHED);
    }

    /// Composites `src` onto this canvas with its top-left corner at `(x, y)`.
    ///
    /// The destination color is ANDed with the source mask, which punches a
    /// hole shaped like the drawn region, then ORed with the masked source
    /// color. The destination mask is ANDed with the source mask as well so
    /// the hole is recorded for the next level up.
    pub fn composite(&mut self, src: &Canvas, x: i32, y: i32) {
        let placed = Rect::new(x, y, src.width as i32, src.height as i32);
        let Some(area) = placed.intersect(&self.bounds()) else {
            return;
        };
        let src_width = src.width as usize;
        let dst_width = self.width as usize;
        for dy in area.y..area.bottom() {
            let src_row = (dy - y) as usize * src_width;
            let dst_row = dy as usize * dst_width;
            for dx in area.x..area.right() {
                let s = src_row + (dx - x) as usize;
                let d = dst_row + dx as usize;
                let m = src.mask[s];
                let c = src.color[s];
                let out = &mut self.color[d];
                for ch in 0..4 {
                    out[ch] = (out[ch] & m) | (c[ch] & !m);
                }
                self.mask[d] &= m;
            }
        }
    }

    pub fn to_pixmap(&self) -> Pixmap {
        Pixmap::from_rgba(self.width, self.height, self.color.iter().flatten().copied().collect())
    }

    pub fn into_pixmap(self) -> Pixmap {
        Pixmap::from_rgba(self.width, self.height, self.color.into_iter().flatten().collect())
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

fn allocate<T: Copy>(len: usize, value: T) -> Option<Vec<T>> {
    let mut plane = Vec::new();
    plane.try_reserve_exact(len).ok()?;
    plane.resize(len, value);
    Some(plane)
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pen", &self.pen)
            .field("brush", &self.brush)
            .field("font", &self.font.spec)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tests/canvas_tests.rs"]
mod tests;
