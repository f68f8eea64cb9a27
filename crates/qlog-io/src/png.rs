//! PNG format support.
//!
//! Normal maps are commonly authored as 8-bit PNGs; 16-bit PNGs keep
//! enough precision for QLog maps with a non-zero bias.
//!
//! # Features
//!
//! - 8-bit and 16-bit read and write
//! - Gray, gray+alpha, RGB and RGBA, read back with the same channel count
//!   (a two-channel QLog map stays two channels)
//! - Palette and sub-byte images are expanded on read
//!
//! No sRGB or gamma chunk is written: normal and QLog data are not colors.

use crate::{ImageData, IoError, IoResult, PixelData, PixelFormat};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Reads a PNG file from the given path.
///
/// # Example
///
/// ```rust,ignore
/// use qlog_io::png;
///
/// let image = png::read("normal.png")?;
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let file = File::open(path.as_ref())?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);

    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let bytes = &buf[..info.buffer_size()];
    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        color_type => {
            return Err(IoError::DecodeError(format!(
                "unexpected color type after expansion: {:?}",
                color_type
            )));
        }
    };

    let (format, data) = match info.bit_depth {
        png::BitDepth::Eight => (PixelFormat::U8, PixelData::U8(bytes.to_vec())),
        png::BitDepth::Sixteen => (PixelFormat::U16, PixelData::U16(bytes_to_u16(bytes))),
        bit_depth => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}",
                info.color_type, bit_depth
            )));
        }
    };

    Ok(ImageData {
        width: info.width,
        height: info.height,
        channels,
        format,
        data,
    })
}

/// Writes an image to a PNG file.
///
/// [`PixelFormat::U8`] data is written as 8-bit; everything else as
/// 16-bit so float data does not lose precision needlessly.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let color_type = match image.channels {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::EncodeError(format!("unsupported channel count: {}", n))),
    };

    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width, image.height);
    encoder.set_color(color_type);
    encoder.set_compression(png::Compression::default());

    let bytes = if image.format == PixelFormat::U8 {
        encoder.set_depth(png::BitDepth::Eight);
        image.to_u8()
    } else {
        encoder.set_depth(png::BitDepth::Sixteen);
        image.to_u16().iter().flat_map(|v| v.to_be_bytes()).collect()
    };

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    png_writer
        .write_image_data(&bytes)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}

/// Converts big-endian byte slice to u16 vector.
fn bytes_to_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_rgb8() {
        let width = 32;
        let height = 32;
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 8) as u8);
                data.push((y * 8) as u8);
                data.push(255);
            }
        }

        let image = ImageData::from_u8(width, height, 3, data.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb8.png");

        write(&path, &image).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");

        assert_eq!(loaded.width, width);
        assert_eq!(loaded.height, height);
        assert_eq!(loaded.channels, 3);
        assert_eq!(loaded.format, PixelFormat::U8);
        assert_eq!(loaded.to_u8(), data);
    }

    #[test]
    fn test_float_written_as_16_bit() {
        let data: Vec<f32> = (0..16 * 16 * 4).map(|i| (i % 97) as f32 / 96.0).collect();
        let image = ImageData::from_f32(16, 16, 4, data.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba16.png");

        write(&path, &image).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");

        assert_eq!(loaded.channels, 4);
        assert_eq!(loaded.format, PixelFormat::U16);
        for (a, b) in loaded.to_f32().iter().zip(data.iter()) {
            assert!((a - b).abs() < 1.0 / 65535.0);
        }
    }

    #[test]
    fn test_gray_keeps_one_channel() {
        let image = ImageData::from_u8(2, 1, 1, vec![10, 200]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");

        write(&path, &image).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");

        assert_eq!(loaded.channels, 1);
        assert_eq!(loaded.to_u8(), vec![10, 200]);
    }

    #[test]
    fn test_two_channel_roundtrip() {
        let data: Vec<u16> = (0..8 * 4 * 2).map(|i| (i * 1031) as u16).collect();
        let image = ImageData::from_u16(8, 4, 2, data.clone());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rg16.png");

        write(&path, &image).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");

        assert_eq!(loaded.channels, 2);
        assert_eq!(loaded.format, PixelFormat::U16);
        assert_eq!(loaded.to_u16(), data);

        let rg8 = ImageData::from_u8(1, 1, 2, vec![255, 128]);
        write(&path, &rg8).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");
        assert_eq!(loaded.channels, 2);
        assert_eq!(loaded.to_u8(), vec![255, 128]);
    }

    #[test]
    fn test_too_many_channels() {
        let image = ImageData::from_u8(1, 1, 5, vec![0; 5]);
        let dir = tempfile::tempdir().unwrap();
        let err = write(dir.path().join("five.png"), &image).unwrap_err();
        assert!(matches!(err, IoError::EncodeError(_)));
    }
}
