//! OpenEXR format support.
//!
//! EXR keeps full float precision, which makes it the lossless choice for
//! round-tripping QLog maps.
//!
//! - Reads the first layer with R and G channels as f32; B and A are
//!   optional, so an RG-only QLog map reads back as two channels
//! - Writes RG, RGB or RGBA, as f16 for [`PixelFormat::F16`] and f32 otherwise
//!
//! # Example
//!
//! ```rust,ignore
//! use qlog_io::exr;
//!
//! let image = exr::read("normal.exr")?;
//! exr::write("qlog.exr", &image)?;
//! ```

use crate::{ImageData, IoError, IoResult, PixelData, PixelFormat};
use std::path::Path;

/// Pixel storage filled by the EXR reader.
struct RgbaBuffer {
    width: usize,
    has_blue: bool,
    has_alpha: bool,
    pixels: Vec<[f32; 4]>,
}

impl RgbaBuffer {
    /// Channels present in the file: RG, RGB, or RGBA (missing B reads as 0).
    fn channels(&self) -> usize {
        if self.has_alpha {
            4
        } else if self.has_blue {
            3
        } else {
            2
        }
    }
}

/// Reads an EXR file from the given path.
///
/// Returns the first layer with R and G channels as f32, keeping the
/// channel count of the file (2, 3 or 4).
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    use exr::prelude::*;

    let image = exr::prelude::read()
        .no_deep_data()
        .largest_resolution_level()
        .specific_channels()
        .required("R")
        .required("G")
        .optional("B", 0.0f32)
        .optional("A", 1.0f32)
        .collect_pixels(
            |resolution, (_, _, blue, alpha)| RgbaBuffer {
                width: resolution.width(),
                has_blue: blue.is_some(),
                has_alpha: alpha.is_some(),
                pixels: vec![[0.0, 0.0, 0.0, 1.0]; resolution.width() * resolution.height()],
            },
            |buffer, position, (r, g, b, a): (f32, f32, f32, f32)| {
                let idx = position.y() * buffer.width + position.x();
                if let Some(px) = buffer.pixels.get_mut(idx) {
                    *px = [r, g, b, a];
                }
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(path.as_ref())
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let width = image.layer_data.size.width() as u32;
    let height = image.layer_data.size.height() as u32;
    let buffer = image.layer_data.channel_data.pixels;
    let channels = buffer.channels();

    Ok(ImageData {
        width,
        height,
        channels: channels as u32,
        format: PixelFormat::F32,
        data: PixelData::F32(
            buffer
                .pixels
                .iter()
                .flat_map(|px| px[..channels].iter().copied())
                .collect(),
        ),
    })
}

/// Writes an image to an EXR file.
///
/// Two-channel images are written as RG, three as RGB, four or more as
/// RGBA (extra channels dropped). Single-channel images are rejected.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    use exr::prelude::*;

    let path = path.as_ref();
    let width = image.width as usize;
    let height = image.height as usize;
    let channels = image.channels as usize;

    if channels < 2 {
        return Err(IoError::EncodeError(format!(
            "unsupported channel count: {}",
            channels
        )));
    }

    let data = image.to_f32();
    let at = |pos: Vec2<usize>, c: usize| data[(pos.y() * width + pos.x()) * channels + c];
    let at_half = |pos: Vec2<usize>, c: usize| f16::from_f32(at(pos, c));

    macro_rules! write_layer {
        ($channels:expr) => {
            Image::from_layer(Layer::new(
                (width, height),
                LayerAttributes::named("RGBA"),
                Encoding::SMALL_LOSSLESS,
                $channels,
            ))
            .write()
            .to_file(path)
        };
    }

    let use_half = image.format == PixelFormat::F16;
    let result = match (use_half, channels.min(4)) {
        (true, 2) => write_layer!(
            SpecificChannels::build()
                .with_channel("R")
                .with_channel("G")
                .with_pixel_fn(|pos: Vec2<usize>| (at_half(pos, 0), at_half(pos, 1)))
        ),
        (true, 3) => write_layer!(SpecificChannels::rgb(|pos: Vec2<usize>| {
            (at_half(pos, 0), at_half(pos, 1), at_half(pos, 2))
        })),
        (true, _) => write_layer!(SpecificChannels::rgba(|pos: Vec2<usize>| {
            (at_half(pos, 0), at_half(pos, 1), at_half(pos, 2), at_half(pos, 3))
        })),
        (false, 2) => write_layer!(
            SpecificChannels::build()
                .with_channel("R")
                .with_channel("G")
                .with_pixel_fn(|pos: Vec2<usize>| (at(pos, 0), at(pos, 1)))
        ),
        (false, 3) => write_layer!(SpecificChannels::rgb(|pos: Vec2<usize>| {
            (at(pos, 0), at(pos, 1), at(pos, 2))
        })),
        (false, _) => write_layer!(SpecificChannels::rgba(|pos: Vec2<usize>| {
            (at(pos, 0), at(pos, 1), at(pos, 2), at(pos, 3))
        })),
    };

    result.map_err(|e| IoError::EncodeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32, channels: u32) -> Vec<f32> {
        (0..width * height * channels)
            .map(|i| i as f32 / (width * height * channels) as f32)
            .collect()
    }

    #[test]
    fn test_roundtrip_rgba_f32() {
        let data = ramp(64, 32, 4);
        let image = ImageData::from_f32(64, 32, 4, data.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.exr");

        write(&path, &image).expect("Failed to write EXR");
        let loaded = read(&path).expect("Failed to read EXR");

        assert_eq!(loaded.width, 64);
        assert_eq!(loaded.height, 32);
        assert_eq!(loaded.channels, 4);
        assert_eq!(loaded.to_f32(), data);
    }

    #[test]
    fn test_rgb_keeps_three_channels() {
        let data = ramp(8, 8, 3);
        let image = ImageData::from_f32(8, 8, 3, data.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.exr");

        write(&path, &image).expect("Failed to write EXR");
        let loaded = read(&path).expect("Failed to read EXR");

        assert_eq!(loaded.channels, 3);
        assert_eq!(loaded.to_f32(), data);
    }

    #[test]
    fn test_rg_roundtrip() {
        let data = ramp(16, 8, 2);
        let image = ImageData::from_f32(16, 8, 2, data.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rg.exr");

        write(&path, &image).expect("Failed to write EXR");
        let loaded = read(&path).expect("Failed to read EXR");

        assert_eq!((loaded.width, loaded.height), (16, 8));
        assert_eq!(loaded.channels, 2);
        assert_eq!(loaded.to_f32(), data);
    }

    #[test]
    fn test_half_precision() {
        let image = ImageData::from_f32(4, 4, 3, ramp(4, 4, 3)).convert_to(PixelFormat::F16);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half.exr");

        write(&path, &image).expect("Failed to write EXR");
        let loaded = read(&path).expect("Failed to read EXR");

        // Data was already rounded through f16, so the file reproduces it exactly.
        assert_eq!(loaded.channels, 3);
        assert_eq!(loaded.to_f32(), image.to_f32());

        let rg = ImageData::from_f32(4, 4, 2, ramp(4, 4, 2)).convert_to(PixelFormat::F16);
        write(&path, &rg).expect("Failed to write EXR");
        assert_eq!(read(&path).expect("Failed to read EXR").to_f32(), rg.to_f32());
    }

    #[test]
    fn test_rejects_single_channel() {
        let image = ImageData::from_f32(2, 2, 1, vec![0.5; 4]);
        let dir = tempfile::tempdir().unwrap();
        let err = write(dir.path().join("one.exr"), &image).unwrap_err();
        assert!(matches!(err, IoError::EncodeError(_)));
    }
}
