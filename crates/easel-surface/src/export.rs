//! Raster export of finished frames.

use std::path::Path;

use crate::error::ExportError;
use crate::pixmap::Pixmap;

/// File formats a frame can be written as. All are written as 24-bit RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Uncompressed BMP, rows stored bottom-up.
    Bitmap,
    /// JPEG at the encoder's default quality.
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bitmap => "bmp",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    fn encoder_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Bitmap => image::ImageFormat::Bmp,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

impl Pixmap {
    /// Writes the frame to `path`, dropping the alpha channel.
    pub fn save(&self, path: impl AsRef<Path>, format: ImageFormat) -> Result<(), ExportError> {
        let path = path.as_ref();
        let rgb = self.to_rgb_bytes();
        image::save_buffer_with_format(
            path,
            &rgb,
            self.width(),
            self.height(),
            image::ExtendedColorType::Rgb8,
            format.encoder_format(),
        )?;
        log::debug!(
            "saved {}x{} frame to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}
