//! Image loading helpers.

use crate::core::errors::OcrResult;
use image::RgbImage;
use std::path::Path;

/// Decodes an encoded image (PNG, JPEG, ...) into an RGB buffer.
pub fn load_image_from_bytes(bytes: &[u8]) -> OcrResult<RgbImage> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

/// Loads an image file into an RGB buffer.
pub fn load_image_from_path(path: &Path) -> OcrResult<RgbImage> {
    let img = image::open(path)?;
    Ok(img.to_rgb8())
}
