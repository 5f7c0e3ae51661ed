//! Image loading for camera captures and files
//!
//! Format is detected from file contents rather than the extension, so phone
//! exports with misleading names still decode.

use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during image I/O operations
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to read image file {path}: {error}")]
    ReadError { path: String, error: String },

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Image has zero size")]
    EmptyImage,
}

impl From<ImageError> for digit_common::ProcessingError {
    fn from(err: ImageError) -> Self {
        digit_common::ProcessingError::ImageError(err.to_string())
    }
}

/// Load an image from a file path
///
/// # Example
/// ```no_run
/// use digit_core::image_io::load_image;
/// let img = load_image("digit.png")?;
/// # Ok::<(), digit_core::image_io::ImageError>(())
/// ```
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage, ImageError> {
    let path = path.as_ref();
    let read_error = |e: std::io::Error| ImageError::ReadError {
        path: path.display().to_string(),
        error: e.to_string(),
    };

    let img = ImageReader::open(path)
        .map_err(read_error)?
        .with_guessed_format()
        .map_err(read_error)?
        .decode()
        .map_err(|e| ImageError::DecodeError(format!("{}: {e}", path.display())))?;

    ensure_non_empty(img)
}

/// Decode an in-memory encoded image (PNG, JPEG, BMP, ...)
pub fn load_image_from_memory(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::DecodeError(e.to_string()))?
        .decode()
        .map_err(|e| ImageError::DecodeError(e.to_string()))?;

    ensure_non_empty(img)
}

fn ensure_non_empty(img: DynamicImage) -> Result<DynamicImage, ImageError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ImageError::EmptyImage);
    }
    Ok(img)
}
