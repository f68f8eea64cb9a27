//! TIFF format support.
//!
//! # Features
//!
//! - 8-bit, 16-bit and 32-bit float
//! - Gray, RGB and RGBA
//! - LZW compression on write
//!
//! # Example
//!
//! ```rust,ignore
//! use qlog_io::tiff;
//!
//! let image = tiff::read("normal.tiff")?;
//! tiff::write("qlog.tiff", &image)?;
//! ```

use crate::{ImageData, IoError, IoResult, PixelData, PixelFormat};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads a TIFF file from the given path.
///
/// Integer data is kept at its stored depth; float data is read as f32.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    use tiff::decoder::{Decoder, DecodingResult};
    use tiff::ColorType;

    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut decoder = Decoder::new(reader)
        .map_err(|e: tiff::TiffError| IoError::DecodeError(e.to_string()))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e: tiff::TiffError| IoError::DecodeError(e.to_string()))?;
    let color_type = decoder
        .colortype()
        .map_err(|e: tiff::TiffError| IoError::DecodeError(e.to_string()))?;

    let channels = match color_type {
        ColorType::Gray(_) => 1,
        ColorType::GrayA(_) => 2,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        ct => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "unsupported TIFF color type: {:?}",
                ct
            )));
        }
    };

    let result = decoder
        .read_image()
        .map_err(|e: tiff::TiffError| IoError::DecodeError(e.to_string()))?;

    let (format, data) = match result {
        DecodingResult::U8(buf) => (PixelFormat::U8, PixelData::U8(buf)),
        DecodingResult::U16(buf) => (PixelFormat::U16, PixelData::U16(buf)),
        DecodingResult::F32(buf) => (PixelFormat::F32, PixelData::F32(buf)),
        _ => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "unsupported TIFF sample type for {:?}",
                color_type
            )));
        }
    };

    Ok(ImageData {
        width,
        height,
        channels,
        format,
        data,
    })
}

/// Writes an image to a TIFF file with LZW compression.
///
/// U8 data is written as 8-bit, U16 as 16-bit, float data as 32-bit float.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    use tiff::encoder::{colortype, compression, TiffEncoder};

    macro_rules! write_lzw {
        ($encoder:expr, $color:ty, $data:expr) => {
            $encoder
                .write_image_with_compression::<$color, compression::Lzw>(
                    image.width,
                    image.height,
                    compression::Lzw,
                    $data,
                )
                .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))
        };
    }

    let file = File::create(path.as_ref())?;
    let mut encoder = TiffEncoder::new(file)
        .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?;

    match (image.format, image.channels) {
        (PixelFormat::U8, 1) => write_lzw!(encoder, colortype::Gray8, &image.to_u8()),
        (PixelFormat::U8, 3) => write_lzw!(encoder, colortype::RGB8, &image.to_u8()),
        (PixelFormat::U8, 4) => write_lzw!(encoder, colortype::RGBA8, &image.to_u8()),
        (PixelFormat::U16, 1) => write_lzw!(encoder, colortype::Gray16, &image.to_u16()),
        (PixelFormat::U16, 3) => write_lzw!(encoder, colortype::RGB16, &image.to_u16()),
        (PixelFormat::U16, 4) => write_lzw!(encoder, colortype::RGBA16, &image.to_u16()),
        (PixelFormat::F16 | PixelFormat::F32, 1) => {
            write_lzw!(encoder, colortype::Gray32Float, &image.to_f32())
        }
        (PixelFormat::F16 | PixelFormat::F32, 3) => {
            write_lzw!(encoder, colortype::RGB32Float, &image.to_f32())
        }
        (PixelFormat::F16 | PixelFormat::F32, 4) => {
            write_lzw!(encoder, colortype::RGBA32Float, &image.to_f32())
        }
        (_, n) => Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_float_rgb() {
        let width = 32;
        let height = 32;
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(x as f32 / width as f32);
                data.push(y as f32 / height as f32);
                data.push(0.5);
            }
        }

        let image = ImageData::from_f32(width, height, 3, data.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.tiff");

        write(&path, &image).expect("Failed to write TIFF");
        let loaded = read(&path).expect("Failed to read TIFF");

        assert_eq!(loaded.width, width);
        assert_eq!(loaded.height, height);
        assert_eq!(loaded.channels, 3);
        assert_eq!(loaded.format, PixelFormat::F32);
        assert_eq!(loaded.to_f32(), data);
    }

    #[test]
    fn test_roundtrip_u16_rgba() {
        let data: Vec<u16> = (0..16 * 16 * 4).map(|i| (i * 61) as u16).collect();
        let image = ImageData::from_u16(16, 16, 4, data.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba16.tif");

        write(&path, &image).expect("Failed to write TIFF");
        let loaded = read(&path).expect("Failed to read TIFF");

        assert_eq!(loaded.channels, 4);
        assert_eq!(loaded.format, PixelFormat::U16);
        assert_eq!(loaded.to_u16(), data);
    }

    #[test]
    fn test_two_channels_rejected_on_write() {
        let image = ImageData::from_u8(1, 1, 2, vec![0, 0]);
        let dir = tempfile::tempdir().unwrap();
        let err = write(dir.path().join("ga.tiff"), &image).unwrap_err();
        assert!(matches!(err, IoError::EncodeError(_)));
    }
}
