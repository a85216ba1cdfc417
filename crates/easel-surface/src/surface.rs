use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use easel_graphics::{Brush, Color, FontSpec, Pen, Point, Rect, Size};
use indexmap::IndexMap;

use crate::canvas::Canvas;
use crate::compositor::composite_tree;
use crate::error::{DrawError, ExportError, SurfaceCreationError};
use crate::export::ImageFormat;
use crate::images::Image;
use crate::pixmap::Pixmap;

pub(crate) struct SurfaceState {
    pub(crate) canvas: Canvas,
    pub(crate) position: Point,
    /// Keyed by the child's allocation address. A dead entry still pins
    /// that allocation, so keys never collide with a live surface.
    pub(crate) children: IndexMap<usize, Weak<Mutex<SurfaceState>>>,
}

/// A shareable handle to an off-screen drawing surface.
///
/// Clones refer to the same pixels; the surface is freed when the last
/// handle drops. Parents only reference children weakly, so dropping a
/// child removes it from every tree it was added to.
#[derive(Clone)]
pub struct Surface {
    inner: Arc<Mutex<SurfaceState>>,
}

/// A non-owning reference to a [`Surface`].
#[derive(Clone, Default)]
pub struct WeakSurface {
    inner: Weak<Mutex<SurfaceState>>,
}

impl WeakSurface {
    pub fn upgrade(&self) -> Option<Surface> {
        self.inner.upgrade().map(|inner| Surface { inner })
    }
}

impl fmt::Debug for WeakSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSurface")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceCreationError> {
        Self::with_position(width, height, 0, 0)
    }

    pub fn with_position(
        width: u32,
        height: u32,
        x: i32,
        y: i32,
    ) -> Result<Self, SurfaceCreationError> {
        let canvas = Canvas::new(width, height)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(SurfaceState {
                canvas,
                position: Point::new(x, y),
                children: IndexMap::new(),
            })),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    pub fn downgrade(&self) -> WeakSurface {
        WeakSurface {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Surface) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs `f` with exclusive access to the canvas, batching several
    /// primitives under one lock.
    pub fn draw<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        f(&mut self.lock().canvas)
    }

    pub fn width(&self) -> u32 {
        self.lock().canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.lock().canvas.height()
    }

    pub fn size(&self) -> Size {
        self.lock().canvas.size()
    }

    pub fn x(&self) -> i32 {
        self.lock().position.x
    }

    pub fn y(&self) -> i32 {
        self.lock().position.y
    }

    /// Offset relative to the parent this surface is composited onto.
    pub fn position(&self) -> Point {
        self.lock().position
    }

    pub fn move_to(&self, x: i32, y: i32) {
        self.lock().position = Point::new(x, y);
    }

    pub fn move_by(&self, dx: i32, dy: i32) {
        let mut state = self.lock();
        state.position = state.position.offset(dx, dy);
    }

    /// Appends `child` to the child list. Adding a surface to itself or
    /// adding it twice changes nothing.
    pub fn add_child(&self, child: &Surface) {
        if self.ptr_eq(child) {
            return;
        }
        self.lock()
            .children
            .entry(child.id())
            .or_insert_with(|| Arc::downgrade(&child.inner));
    }

    pub fn remove_child(&self, child: &Surface) -> bool {
        self.lock().children.shift_remove(&child.id()).is_some()
    }

    /// Live children in composite order. Dropped children are pruned.
    pub fn children(&self) -> Vec<Surface> {
        let mut state = self.lock();
        state.children.retain(|_, weak| weak.strong_count() > 0);
        state
            .children
            .values()
            .filter_map(|weak| weak.upgrade().map(|inner| Surface { inner }))
            .collect()
    }

    pub fn pen(&self) -> Pen {
        self.lock().canvas.pen()
    }

    pub fn set_pen(&self, pen: Pen) {
        self.lock().canvas.set_pen(pen);
    }

    pub fn brush(&self) -> Brush {
        self.lock().canvas.brush()
    }

    pub fn set_brush(&self, brush: Brush) {
        self.lock().canvas.set_brush(brush);
    }

    pub fn font(&self) -> FontSpec {
        self.lock().canvas.font().clone()
    }

    pub fn set_font(&self, size: f32, family: &str, color: Color) -> Result<(), DrawError> {
        self.lock().canvas.set_font(size, family, color)
    }

    pub fn clear(&self) {
        self.lock().canvas.clear();
    }

    pub fn fill(&self, color: Color) {
        self.lock().canvas.fill(color);
    }

    pub fn line(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DrawError> {
        self.lock().canvas.line(x0, y0, x1, y1)
    }

    pub fn rect(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DrawError> {
        self.lock().canvas.rect(x0, y0, x1, y1)
    }

    pub fn ellipse(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DrawError> {
        self.lock().canvas.ellipse(x0, y0, x1, y1)
    }

    pub fn rounded_rect(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        corner_w: i32,
        corner_h: i32,
    ) -> Result<(), DrawError> {
        self.lock()
            .canvas
            .rounded_rect(x0, y0, x1, y1, corner_w, corner_h)
    }

    pub fn arc(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        start: f64,
        sweep: f64,
    ) -> Result<(), DrawError> {
        self.lock().canvas.arc(x0, y0, x1, y1, start, sweep)
    }

    pub fn chord(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        start: f64,
        sweep: f64,
    ) -> Result<(), DrawError> {
        self.lock().canvas.chord(x0, y0, x1, y1, start, sweep)
    }

    pub fn pie(
        &self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        start: f64,
        sweep: f64,
    ) -> Result<(), DrawError> {
        self.lock().canvas.pie(x0, y0, x1, y1, start, sweep)
    }

    pub fn text(&self, x: i32, y: i32, text: &str) -> Result<(), DrawError> {
        self.lock().canvas.text(x, y, text)
    }

    pub fn draw_image(&self, image: &Image, x: i32, y: i32) -> Result<(), DrawError> {
        self.lock().canvas.draw_image(image, x, y)
    }

    pub fn draw_image_scaled(
        &self,
        image: &Image,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<(), DrawError> {
        self.lock()
            .canvas
            .draw_image_scaled(image, x, y, width, height)
    }

    pub fn draw_image_keyed(
        &self,
        image: &Image,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        key: Color,
    ) -> Result<(), DrawError> {
        self.lock()
            .canvas
            .draw_image_keyed(image, x, y, width, height, key)
    }

    pub fn draw_image_masked(
        &self,
        src: &Image,
        mask: &Image,
        dest: Rect,
        src_origin: Point,
        mask_origin: Point,
    ) -> Result<(), DrawError> {
        self.lock()
            .canvas
            .draw_image_masked(src, mask, dest, src_origin, mask_origin)
    }

    /// Snapshot of this surface and its children on an opaque white
    /// background, sized like this surface.
    pub fn render(&self) -> Result<Pixmap, SurfaceCreationError> {
        let size = self.size();
        let mut frame = Canvas::new(size.width, size.height)?;
        frame.fill(Color::WHITE);
        composite_tree(self, &mut frame, 0, 0);
        Ok(frame.into_pixmap())
    }

    pub fn save_as(&self, path: impl AsRef<Path>, format: ImageFormat) -> Result<(), ExportError> {
        self.render()?.save(path, format)
    }

    pub fn save_as_bitmap(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        self.save_as(path, ImageFormat::Bitmap)
    }

    pub fn save_as_jpeg(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        self.save_as(path, ImageFormat::Jpeg)
    }

    pub fn save_as_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        self.save_as(path, ImageFormat::Png)
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Surface {}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Surface")
            .field("size", &state.canvas.size())
            .field("position", &state.position)
            .field("children", &state.children.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
