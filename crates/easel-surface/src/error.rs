use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceCreationError {
    #[error("surface size {width}x{height} is empty")]
    Empty { width: u32, height: u32 },

    #[error("surface size {width}x{height} exceeds the {max} pixel side limit")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("could not allocate pixel planes for a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },
}

/// A single primitive failed. The surface stays usable.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("font family `{family}` is not available")]
    FontUnavailable { family: String },

    #[error("invalid image: {0}")]
    InvalidImage(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("invalid pixel data: expected {expected} bytes, got {got}")]
    InvalidPixelData { expected: usize, got: usize },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("font data for `{family}` could not be parsed")]
    Invalid { family: String },

    #[error("font file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not render surface for export: {0}")]
    Render(#[from] SurfaceCreationError),

    #[error("failed to encode or write image: {0}")]
    Encode(#[from] image::ImageError),
}
