//! Format detection utilities.
//!
//! Detects image formats from file extensions and magic bytes.

use crate::IoResult;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// OpenEXR format.
    Exr,
    /// PNG format.
    Png,
    /// TIFF format.
    Tiff,
    /// Unknown/unsupported format.
    Unknown,
}

impl Format {
    /// Detects format from file path (magic bytes, then extension).
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();

        if let Ok(format) = Self::from_magic_bytes(path) {
            if format != Format::Unknown {
                return Ok(format);
            }
        }

        Ok(Self::from_extension(path))
    }

    /// Detects format from file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("exr") => Format::Exr,
            Some("png") => Format::Png,
            Some("tif") | Some("tiff") => Format::Tiff,
            _ => Format::Unknown,
        }
    }

    /// Detects format from file magic bytes.
    pub fn from_magic_bytes<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let mut file = File::open(path)?;
        let mut header = [0u8; 8];

        let bytes_read = file.read(&mut header)?;
        Ok(Self::from_bytes(&header[..bytes_read]))
    }

    /// Detects format from raw bytes (magic number check).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() < 4 {
            return Format::Unknown;
        }

        // EXR: 0x76 0x2f 0x31 0x01
        if bytes[0..4] == [0x76, 0x2f, 0x31, 0x01] {
            return Format::Exr;
        }

        // PNG: 0x89 'P' 'N' 'G' \r \n 0x1A \n
        if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return Format::Png;
        }

        // TIFF: II (little-endian) or MM (big-endian)
        if bytes[0..4] == [0x49, 0x49, 0x2A, 0x00] || bytes[0..4] == [0x4D, 0x4D, 0x00, 0x2A] {
            return Format::Tiff;
        }

        Format::Unknown
    }

    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Exr => "exr",
            Format::Png => "png",
            Format::Tiff => "tiff",
            Format::Unknown => "unknown",
        }
    }
}
