//! CLI command implementations

pub mod convert;

use anyhow::{Context, Result, bail};
use qlog_io::{ImageData, PixelFormat};
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<ImageData> {
    qlog_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &ImageData) -> Result<()> {
    qlog_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Parses a bit depth name into a pixel format.
pub fn parse_depth(s: &str) -> Result<PixelFormat> {
    match s.to_lowercase().as_str() {
        "8" | "u8" | "uint8" => Ok(PixelFormat::U8),
        "16" | "u16" | "uint16" => Ok(PixelFormat::U16),
        "32" | "f32" | "float" | "float32" => Ok(PixelFormat::F32),
        "half" | "f16" | "float16" => Ok(PixelFormat::F16),
        _ => bail!(
            "Unknown bit depth '{}'. Options: 8, 16, 32, half (or u8, u16, f32, f16)",
            s
        ),
    }
}
