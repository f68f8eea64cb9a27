//! # qlog-io
//!
//! Image I/O for normal maps and QLog maps.
//!
//! The conversion core only needs "decode a file into f32 channels" and
//! "encode f32 channels to a file"; this crate provides both for the
//! formats texture pipelines use for normal data:
//!
//! - **EXR** - OpenEXR, 16f/32f, first layer with R and G (B, A optional)
//! - **PNG** - 8 and 16 bit, gray to RGBA
//! - **TIFF** - 8, 16 bit and 32-bit float
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use qlog_io::{read, write};
//!
//! let image = read("normal.png")?;
//! let samples = image.to_f32();
//! // ... convert samples ...
//! write("qlog.png", &image)?;
//! ```
//!
//! # Bit Depth
//!
//! [`ImageData::format`] records the precision the data came from and
//! drives the precision it is written with. Use [`ImageData::convert_to`]
//! to change it.
//!
//! # Feature Flags
//!
//! - `exr` - OpenEXR support (default)
//! - `png` - PNG support (default)
//! - `tiff` - TIFF support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;

#[cfg(feature = "exr")]
pub mod exr;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "tiff")]
pub mod tiff;

pub use detect::Format;
pub use error::{IoError, IoResult};

use std::path::Path;
use tracing::{debug, trace};

/// Reads an image from a file, auto-detecting the format.
///
/// The format is detected by magic bytes, then by file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The format is not supported
/// - The file is corrupted
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    trace!(path = %path.display(), format = format.name(), "qlog_io::read");

    let image = match format {
        #[cfg(feature = "exr")]
        Format::Exr => exr::read(path)?,

        #[cfg(feature = "png")]
        Format::Png => png::read(path)?,

        #[cfg(feature = "tiff")]
        Format::Tiff => tiff::read(path)?,

        _ => return Err(unsupported(path)),
    };

    debug!(
        path = %path.display(),
        width = image.width,
        height = image.height,
        channels = image.channels,
        format = ?image.format,
        "Decoded image"
    );
    Ok(image)
}

/// Writes an image to a file, detecting format from extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be created
/// - The extension names no supported format
/// - The channel count is incompatible with the format
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let path = path.as_ref();
    let format = Format::from_extension(path);
    trace!(path = %path.display(), format = format.name(), "qlog_io::write");

    match format {
        #[cfg(feature = "exr")]
        Format::Exr => exr::write(path, image),

        #[cfg(feature = "png")]
        Format::Png => png::write(path, image),

        #[cfg(feature = "tiff")]
        Format::Tiff => tiff::write(path, image),

        _ => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> IoError {
    IoError::UnsupportedFormat(
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    )
}

/// Image data container for I/O operations.
///
/// Interleaved samples plus the precision they were stored with.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of interleaved channels.
    pub channels: u32,
    /// Pixel data format.
    pub format: PixelFormat,
    /// Raw pixel data.
    pub data: PixelData,
}

/// Pixel data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit unsigned integer per channel.
    U8,
    /// 16-bit unsigned integer per channel.
    U16,
    /// 16-bit float per channel (stored as f32).
    F16,
    /// 32-bit float per channel.
    F32,
}

/// Raw pixel data storage.
#[derive(Debug, Clone)]
pub enum PixelData {
    /// 8-bit unsigned data.
    U8(Vec<u8>),
    /// 16-bit unsigned data.
    U16(Vec<u16>),
    /// 32-bit float data (also used for f16 after conversion).
    F32(Vec<f32>),
}

impl ImageData {
    /// Creates ImageData from f32 pixel data.
    pub fn from_f32(width: u32, height: u32, channels: u32, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::F32,
            data: PixelData::F32(data),
        }
    }

    /// Creates ImageData from u8 pixel data.
    pub fn from_u8(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::U8,
            data: PixelData::U8(data),
        }
    }

    /// Creates ImageData from u16 pixel data.
    pub fn from_u16(width: u32, height: u32, channels: u32, data: Vec<u16>) -> Self {
        Self {
            width,
            height,
            channels,
            format: PixelFormat::U16,
            data: PixelData::U16(data),
        }
    }

    /// Returns the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Converts pixel data to f32 in [0, 1] for integer formats.
    pub fn to_f32(&self) -> Vec<f32> {
        match &self.data {
            PixelData::U8(data) => data.iter().map(|&v| v as f32 / 255.0).collect(),
            PixelData::U16(data) => data.iter().map(|&v| v as f32 / 65535.0).collect(),
            PixelData::F32(data) => data.clone(),
        }
    }

    /// Converts pixel data to u8, rounding to nearest and clamping to [0, 1].
    pub fn to_u8(&self) -> Vec<u8> {
        match &self.data {
            PixelData::U8(data) => data.clone(),
            PixelData::U16(data) => data
                .iter()
                .map(|&v| ((v as u32 * 255 + 32767) / 65535) as u8)
                .collect(),
            PixelData::F32(data) => data
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect(),
        }
    }

    /// Converts pixel data to u16, rounding to nearest and clamping to [0, 1].
    pub fn to_u16(&self) -> Vec<u16> {
        match &self.data {
            PixelData::U8(data) => data.iter().map(|&v| v as u16 * 257).collect(),
            PixelData::U16(data) => data.clone(),
            PixelData::F32(data) => data
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
                .collect(),
        }
    }

    /// Returns a copy re-quantized to `format`.
    ///
    /// [`PixelFormat::F16`] rounds every sample through half precision so
    /// the in-memory data matches what an f16 file will hold.
    pub fn convert_to(&self, format: PixelFormat) -> Self {
        let data = match format {
            PixelFormat::U8 => PixelData::U8(self.to_u8()),
            PixelFormat::U16 => PixelData::U16(self.to_u16()),
            PixelFormat::F16 => PixelData::F32(
                self.to_f32()
                    .into_iter()
                    .map(|v| half::f16::from_f32(v).to_f32())
                    .collect(),
            ),
            PixelFormat::F32 => PixelData::F32(self.to_f32()),
        };

        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            format,
            data,
        }
    }
}
