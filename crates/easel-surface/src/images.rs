//! Decoded raster images and the canvas operations that draw them.

use std::fmt;
use std::path::Path;

use easel_graphics::{Color, Point, Rect, Size};

use crate::canvas::Canvas;
use crate::error::{DrawError, ImageError};

/// Source pixels with alpha below this are treated as not drawn.
const ALPHA_CUTOFF: u8 = 128;
/// Mask pixels darker than this select the source pixel.
const MASK_CUTOFF: u32 = 128;

/// An RGBA image held in memory, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Image {
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(ImageError::InvalidPixelData {
                expected,
                got: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decodes BMP, PNG or JPEG data.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_buffer(decoded))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let decoded = image::open(path.as_ref())?.to_rgba8();
        Ok(Self::from_buffer(decoded))
    }

    fn from_buffer(buffer: image::RgbaImage) -> Self {
        let (width, height) = buffer.dimensions();
        let pixels = buffer.pixels().map(|px| px.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(Size::new(self.width, self.height))
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn placement(x: i32, y: i32, width: u32, height: u32) -> Rect {
    let size = Rect::from_size(Size::new(width, height));
    Rect::new(x, y, size.width, size.height)
}

fn luminance(px: [u8; 4]) -> u32 {
    (px[0] as u32 * 299 + px[1] as u32 * 587 + px[2] as u32 * 114) / 1000
}

impl Canvas {
    /// Draws `image` at its natural size with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: &Image, x: i32, y: i32) -> Result<(), DrawError> {
        self.draw_image_scaled(image, x, y, image.width, image.height)
    }

    /// Draws `image` stretched to `width` x `height`, nearest neighbour.
    pub fn draw_image_scaled(
        &mut self,
        image: &Image,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<(), DrawError> {
        self.blit_scaled(image, placement(x, y, width, height), |px| {
            px[3] >= ALPHA_CUTOFF
        })
    }

    /// Like [`Canvas::draw_image_scaled`] but pixels equal to `key` are left untouched.
    pub fn draw_image_keyed(
        &mut self,
        image: &Image,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        key: Color,
    ) -> Result<(), DrawError> {
        self.blit_scaled(image, placement(x, y, width, height), |px| {
            px[3] >= ALPHA_CUTOFF && Color::from_rgba(px) != key
        })
    }

    /// Copies a `dest.width` x `dest.height` region of `src` starting at
    /// `src_origin` to `dest`, keeping only pixels whose counterpart in
    /// `mask`, read from `mask_origin`, is dark.
    pub fn draw_image_masked(
        &mut self,
        src: &Image,
        mask: &Image,
        dest: Rect,
        src_origin: Point,
        mask_origin: Point,
    ) -> Result<(), DrawError> {
        if dest.is_empty() {
            return Ok(());
        }
        let src_region = Rect::new(src_origin.x, src_origin.y, dest.width, dest.height);
        let mask_region = Rect::new(mask_origin.x, mask_origin.y, dest.width, dest.height);
        if src_region.intersect(&src.bounds()) != Some(src_region) {
            return Err(DrawError::InvalidImage(format!(
                "source region {src_region:?} exceeds a {}x{} image",
                src.width, src.height
            )));
        }
        if mask_region.intersect(&mask.bounds()) != Some(mask_region) {
            return Err(DrawError::InvalidImage(format!(
                "mask region {mask_region:?} exceeds a {}x{} image",
                mask.width, mask.height
            )));
        }
        let Some(area) = dest.intersect(&self.bounds()) else {
            return Ok(());
        };
        for py in area.y..area.bottom() {
            let dy = py - dest.y;
            for px in area.x..area.right() {
                let dx = px - dest.x;
                let (Some(pixel), Some(m)) = (
                    src.pixel(src_origin.x + dx, src_origin.y + dy),
                    mask.pixel(mask_origin.x + dx, mask_origin.y + dy),
                ) else {
                    continue;
                };
                if luminance(m) < MASK_CUTOFF {
                    self.touch(px, py, Color::from_rgba(pixel));
                }
            }
        }
        Ok(())
    }

    fn blit_scaled(
        &mut self,
        image: &Image,
        dest: Rect,
        keep: impl Fn([u8; 4]) -> bool,
    ) -> Result<(), DrawError> {
        if dest.is_empty() {
            return Ok(());
        }
        if image.width == 0 || image.height == 0 {
            return Err(DrawError::InvalidImage("image has no pixels".to_string()));
        }
        let Some(area) = dest.intersect(&self.bounds()) else {
            return Ok(());
        };
        for py in area.y..area.bottom() {
            let sy = ((py - dest.y) as i64 * image.height as i64 / dest.height as i64) as i32;
            for px in area.x..area.right() {
                let sx = ((px - dest.x) as i64 * image.width as i64 / dest.width as i64) as i32;
                if let Some(pixel) = image.pixel(sx, sy) {
                    if keep(pixel) {
                        self.touch(px, py, Color::from_rgba(pixel));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/images_tests.rs"]
mod tests;
