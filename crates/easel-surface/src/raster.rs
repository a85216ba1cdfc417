//! Shape rasterization. Every primitive writes through [`Canvas::touch`],
//! so the color and mask planes always receive the same geometry.
//!
//! Shape math runs in `i64` so corners anywhere in the `i32` range work,
//! and every loop is bounded by the canvas rather than by the shape.

use easel_graphics::{sweep_contains, Color, Rect};

use crate::canvas::Canvas;
use crate::error::DrawError;

/// Box spanned by two corners, in widened coordinates.
#[derive(Clone, Copy, Debug)]
struct Frame {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl Frame {
    fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
        Self {
            left: x0.min(x1),
            top: y0.min(y1),
            right: x0.max(x1),
            bottom: y0.max(y1),
        }
    }

    fn width(&self) -> i64 {
        self.right - self.left
    }

    fn height(&self) -> i64 {
        self.bottom - self.top
    }

    fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    fn inset(&self, amount: i64) -> Self {
        Self {
            left: self.left + amount,
            top: self.top + amount,
            right: self.right - amount,
            bottom: self.bottom - amount,
        }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Part of `bounds` covered by the box.
    fn clip(&self, bounds: Rect) -> Option<Rect> {
        let left = self.left.max(i64::from(bounds.x));
        let top = self.top.max(i64::from(bounds.y));
        let right = self.right.min(i64::from(bounds.right()));
        let bottom = self.bottom.min(i64::from(bounds.bottom()));
        if right <= left || bottom <= top {
            return None;
        }
        // Inside `bounds`, so every value fits in i32.
        Some(Rect::new(
            left as i32,
            top as i32,
            (right - left) as i32,
            (bottom - top) as i32,
        ))
    }
}

/// An ellipse inscribed in a half-open box, in pixel-center space.
#[derive(Clone, Copy, Debug)]
struct Ellipse {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
}

impl Ellipse {
    fn inscribed(frame: Frame) -> Self {
        Self {
            cx: frame.left as f64 + frame.width() as f64 / 2.0,
            cy: frame.top as f64 + frame.height() as f64 / 2.0,
            rx: frame.width() as f64 / 2.0,
            ry: frame.height() as f64 / 2.0,
        }
    }

    fn shrunk(&self, amount: f64) -> Self {
        Self {
            rx: self.rx - amount,
            ry: self.ry - amount,
            ..*self
        }
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let nx = (x - self.cx) / self.rx;
        let ny = (y - self.cy) / self.ry;
        nx * nx + ny * ny <= 1.0
    }

    /// Angle of a point in degrees, 3 o'clock = 0, counter-clockwise on screen.
    fn angle_of(&self, x: f64, y: f64) -> f64 {
        let nx = (x - self.cx) / self.rx.max(f64::EPSILON);
        let ny = (self.cy - y) / self.ry.max(f64::EPSILON);
        ny.atan2(nx).to_degrees()
    }

    fn point_at(&self, degrees: f64) -> (f64, f64) {
        let rad = degrees.to_radians();
        (self.cx + self.rx * rad.cos(), self.cy - self.ry * rad.sin())
    }
}

impl Canvas {
    /// Draws a line with the current pen, round caps included.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DrawError> {
        if self.pen.is_transparent() {
            return Ok(());
        }
        let pen = self.pen;
        let margin = i64::from(pen.width / 2) + 2;
        let from = (i64::from(x0), i64::from(y0));
        let to = (i64::from(x1), i64::from(y1));
        let Some(((x0, y0), (x1, y1))) = clip_segment(from, to, self.bounds(), margin) else {
            return Ok(());
        };
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x, y, pen.width, pen.color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        Ok(())
    }

    pub fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DrawError> {
        let rect = Frame::from_corners(x0, y0, x1, y1);
        let inner = rect.inset(i64::from(self.pen.width));
        self.paint(
            rect,
            |x, y| rect.contains(x.floor() as i64, y.floor() as i64),
            |x, y| {
                let (px, py) = (x.floor() as i64, y.floor() as i64);
                rect.contains(px, py) && !inner.contains(px, py)
            },
        );
        Ok(())
    }

    pub fn ellipse(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DrawError> {
        let rect = Frame::from_corners(x0, y0, x1, y1);
        let outer = Ellipse::inscribed(rect);
        let inner = outer.shrunk(self.pen.width as f64);
        self.paint(
            rect,
            |x, y| outer.contains(x, y),
            |x, y| outer.contains(x, y) && !inner.contains(x, y),
        );
        Ok(())
    }

    /// Rectangle whose corners are quarter ellipses `corner_w` by `corner_h`.
    pub fn rounded_rect(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        corner_w: i32,
        corner_h: i32,
    ) -> Result<(), DrawError> {
        let rect = Frame::from_corners(x0, y0, x1, y1);
        let pen = i64::from(self.pen.width);
        let a = (corner_w.max(0) as f64 / 2.0).min(rect.width() as f64 / 2.0);
        let b = (corner_h.max(0) as f64 / 2.0).min(rect.height() as f64 / 2.0);
        let inner = rect.inset(pen);
        let (ia, ib) = (a - pen as f64, b - pen as f64);
        self.paint(
            rect,
            |x, y| in_rounded_rect(rect, a, b, x, y),
            |x, y| in_rounded_rect(rect, a, b, x, y) && !in_rounded_rect(inner, ia, ib, x, y),
        );
        Ok(())
    }

    /// Outline of the elliptic arc from `start` sweeping `sweep` degrees.
    pub fn arc(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        start: f64,
        sweep: f64,
    ) -> Result<(), DrawError> {
        if self.pen.is_transparent() {
            return Ok(());
        }
        let rect = Frame::from_corners(x0, y0, x1, y1);
        let outer = Ellipse::inscribed(rect);
        let inner = outer.shrunk(self.pen.width as f64);
        let color = self.pen.color;
        self.fill_where(rect, color, |x, y| {
            outer.contains(x, y)
                && !inner.contains(x, y)
                && sweep_contains(start, sweep, outer.angle_of(x, y))
        });
        Ok(())
    }

    /// Arc closed by the segment joining its two ends.
    pub fn chord(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        start: f64,
        sweep: f64,
    ) -> Result<(), DrawError> {
        let rect = Frame::from_corners(x0, y0, x1, y1);
        let outer = Ellipse::inscribed(rect);
        let inner = outer.shrunk(self.pen.width as f64);
        let full = sweep.abs() >= 360.0;
        let from = outer.point_at(start);
        let to = outer.point_at(start + sweep);
        let reference = side_of(from, to, outer.point_at(start + sweep / 2.0));
        let half_pen = self.pen.width as f64 / 2.0;
        self.paint(
            rect,
            |x, y| {
                outer.contains(x, y)
                    && (full || (reference != 0.0 && side_of(from, to, (x, y)) * reference >= 0.0))
            },
            |x, y| {
                if !outer.contains(x, y) {
                    return false;
                }
                let on_curve = !inner.contains(x, y) && sweep_contains(start, sweep, outer.angle_of(x, y));
                on_curve || (!full && segment_distance((x, y), from, to) <= half_pen)
            },
        );
        Ok(())
    }

    /// Elliptic sector closed by the two radii.
    pub fn pie(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        start: f64,
        sweep: f64,
    ) -> Result<(), DrawError> {
        let rect = Frame::from_corners(x0, y0, x1, y1);
        let outer = Ellipse::inscribed(rect);
        let inner = outer.shrunk(self.pen.width as f64);
        let center = (outer.cx, outer.cy);
        let from = outer.point_at(start);
        let to = outer.point_at(start + sweep);
        let half_pen = self.pen.width as f64 / 2.0;
        self.paint(
            rect,
            |x, y| outer.contains(x, y) && sweep_contains(start, sweep, outer.angle_of(x, y)),
            |x, y| {
                if !outer.contains(x, y) {
                    return false;
                }
                let on_curve = !inner.contains(x, y) && sweep_contains(start, sweep, outer.angle_of(x, y));
                on_curve
                    || segment_distance((x, y), center, from) <= half_pen
                    || segment_distance((x, y), center, to) <= half_pen
            },
        );
        Ok(())
    }

    /// Fills with the brush where `inside` holds, then outlines with the pen where `ring` holds.
    fn paint(
        &mut self,
        bounds: Frame,
        inside: impl Fn(f64, f64) -> bool,
        ring: impl Fn(f64, f64) -> bool,
    ) {
        if let Some(color) = self.brush.color() {
            self.fill_where(bounds, color, &inside);
        }
        if !self.pen.is_transparent() {
            let color = self.pen.color;
            self.fill_where(bounds, color, &ring);
        }
    }

    fn fill_where(&mut self, bounds: Frame, color: Color, pred: impl Fn(f64, f64) -> bool) {
        let Some(area) = bounds.clip(self.bounds()) else {
            return;
        };
        for py in area.y..area.bottom() {
            for px in area.x..area.right() {
                if pred(px as f64 + 0.5, py as f64 + 0.5) {
                    self.touch(px, py, color);
                }
            }
        }
    }

    /// Pen disc centred on `(x, y)`, visited only where it meets the canvas.
    fn stamp(&mut self, x: i64, y: i64, width: u32, color: Color) {
        let bounds = self.bounds();
        let radius = f64::from(width.max(1)) / 2.0;
        let reach = if width <= 1 { 0 } else { radius.ceil() as i64 };
        let disc = Frame {
            left: x - reach,
            top: y - reach,
            right: x + reach + 1,
            bottom: y + reach + 1,
        };
        let Some(area) = disc.clip(bounds) else {
            return;
        };
        for py in area.y..area.bottom() {
            for px in area.x..area.right() {
                let (ox, oy) = ((i64::from(px) - x) as f64, (i64::from(py) - y) as f64);
                if reach == 0 || ox * ox + oy * oy <= radius * radius {
                    self.touch(px, py, color);
                }
            }
        }
    }
}

/// Cuts the segment to `bounds` grown by `margin` on every side, or
/// returns `None` if it misses that box.
fn clip_segment(
    from: (i64, i64),
    to: (i64, i64),
    bounds: Rect,
    margin: i64,
) -> Option<((i64, i64), (i64, i64))> {
    let left = (i64::from(bounds.x) - margin) as f64;
    let top = (i64::from(bounds.y) - margin) as f64;
    let right = (i64::from(bounds.right()) - 1 + margin) as f64;
    let bottom = (i64::from(bounds.bottom()) - 1 + margin) as f64;
    let (fx, fy) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, fx - left), (dx, right - fx), (-dy, fy - top), (dy, bottom - fy)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let at = |t: f64| ((fx + dx * t).round() as i64, (fy + dy * t).round() as i64);
    let start = if t0 > 0.0 { at(t0) } else { from };
    let end = if t1 < 1.0 { at(t1) } else { to };
    Some((start, end))
}

fn in_rounded_rect(rect: Frame, a: f64, b: f64, x: f64, y: f64) -> bool {
    let (left, top) = (rect.left as f64, rect.top as f64);
    let (right, bottom) = (rect.right as f64, rect.bottom as f64);
    if rect.is_empty() || x < left || x >= right || y < top || y >= bottom {
        return false;
    }
    if a <= 0.0 || b <= 0.0 {
        return true;
    }
    let cx = if x < left + a {
        left + a
    } else if x > right - a {
        right - a
    } else {
        return true;
    };
    let cy = if y < top + b {
        top + b
    } else if y > bottom - b {
        bottom - b
    } else {
        return true;
    };
    let nx = (x - cx) / a;
    let ny = (y - cy) / b;
    nx * nx + ny * ny <= 1.0
}

fn side_of(from: (f64, f64), to: (f64, f64), p: (f64, f64)) -> f64 {
    (to.0 - from.0) * (p.1 - from.1) - (to.1 - from.1) * (p.0 - from.0)
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let (qx, qy) = (a.0 + abx * t, a.1 + aby * t);
    ((p.0 - qx).powi(2) + (p.1 - qy).powi(2)).sqrt()
}

#[cfg(test)]
#[path = "tests/raster_tests.rs"]
mod tests;
