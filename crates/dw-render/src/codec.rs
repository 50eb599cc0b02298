//! PNG encoding and decoding

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::info;

use crate::RenderError;

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Decode PNG bytes into an RGBA image
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    Ok(image.to_rgba8())
}

/// Write already-encoded PNG bytes to a file
pub fn write_png(bytes: &[u8], path: impl AsRef<Path>) -> Result<(), RenderError> {
    std::fs::write(path.as_ref(), bytes)?;
    info!(path = %path.as_ref().display(), bytes = bytes.len(), "map written");
    Ok(())
}
