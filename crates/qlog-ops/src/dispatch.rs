//! Whole-image conversion.
//!
//! [`QLogConverter`] applies the forward or inverse per-pixel transform to
//! every pixel of an interleaved f32 buffer, in place. Pixels are
//! independent, so with the `parallel` feature the rows are handed to the
//! rayon pool as disjoint mutable slices; nothing is shared between workers
//! except the converter itself, which is `Copy`.
//!
//! # Example
//!
//! ```rust
//! use qlog_core::ConvertConfig;
//! use qlog_ops::QLogConverter;
//!
//! // 2x1 RGBA normal map, both pixels pointing straight up.
//! let mut samples = vec![0.5, 0.5, 1.0, 1.0, 0.5, 0.5, 1.0, 0.25];
//! let converter = QLogConverter::new(&ConvertConfig::new());
//! converter.apply(&mut samples, 2, 1, 4).unwrap();
//!
//! assert_eq!(samples, vec![0.5, 0.5, 0.5, 1.0, 0.5, 0.5, 0.5, 0.25]);
//! ```

use crate::forward::{QLOG_FILL, encode_pixel};
use crate::inverse::decode_pixel;
use crate::{Bias, OpsError, OpsResult};
use qlog_core::{ConvertConfig, Direction};
use tracing::{debug, trace};

/// Channels written in place by either direction.
pub const PIXEL_CHANNELS: usize = 3;

/// Per-pixel converter with its parameters resolved once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QLogConverter {
    direction: Direction,
    derive_z: bool,
    bias: Bias,
}

impl QLogConverter {
    /// Resolves a configuration into a converter.
    ///
    /// The bias exponents are computed here and reused for every pixel.
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            direction: config.direction,
            derive_z: config.derive_z,
            bias: Bias::new(config.bias),
        }
    }

    /// Conversion direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether Z is recomputed from X and Y (forward only).
    pub fn derive_z(&self) -> bool {
        self.derive_z
    }

    /// Resolved bias curve.
    pub fn bias(&self) -> Bias {
        self.bias
    }

    /// Converts a single interleaved pixel in place.
    ///
    /// Only the first three channels are touched.
    ///
    /// # Panics
    ///
    /// Panics if `pixel` has fewer than [`PIXEL_CHANNELS`] channels.
    #[inline]
    pub fn convert_pixel(&self, pixel: &mut [f32]) {
        let out = match self.direction {
            Direction::Forward => {
                encode_pixel([pixel[0], pixel[1], pixel[2]], self.derive_z, &self.bias)
            }
            Direction::Inverse => decode_pixel([pixel[0], pixel[1]], &self.bias),
        };
        pixel[..PIXEL_CHANNELS].copy_from_slice(&out);
    }

    /// Converts an owned image buffer, widening it first if needed.
    ///
    /// Inverse conversion accepts two-channel QLog maps: the decoded Z needs
    /// a third channel, so such buffers are re-interleaved with a
    /// [`QLOG_FILL`] channel before converting. Forward conversion needs
    /// three channels. Returns the converted buffer and its channel count.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidDimensions`] as for [`apply`](Self::apply)
    /// - [`OpsError::ChannelCount`] if `channels` is below
    ///   [`Direction::min_input_channels`]
    pub fn convert_image(
        &self,
        samples: Vec<f32>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> OpsResult<(Vec<f32>, usize)> {
        check_geometry(&samples, width, height, channels)?;

        let required = self.direction.min_input_channels();
        if channels < required {
            return Err(OpsError::ChannelCount {
                op: self.op_name(),
                required,
                actual: channels,
            });
        }

        let (mut samples, channels) = if channels < PIXEL_CHANNELS {
            debug!(from = channels, to = PIXEL_CHANNELS, "Widening input channels");
            (
                widen_channels(&samples, channels, PIXEL_CHANNELS, QLOG_FILL),
                PIXEL_CHANNELS,
            )
        } else {
            (samples, channels)
        };

        self.apply(&mut samples, width, height, channels)?;
        Ok((samples, channels))
    }

    /// Converts every pixel of an interleaved buffer in place.
    ///
    /// Runs across the rayon pool when the `parallel` feature is enabled,
    /// one row per task. Channels past the third are left untouched.
    ///
    /// Both directions write three channels in place, so even inverse
    /// conversion needs `channels >= 3` here. Use
    /// [`convert_image`](Self::convert_image) for two-channel QLog maps.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidDimensions`] if any dimension is zero or
    ///   `samples.len() != width * height * channels`
    /// - [`OpsError::ChannelCount`] if `channels < 3`
    pub fn apply(
        &self,
        samples: &mut [f32],
        width: usize,
        height: usize,
        channels: usize,
    ) -> OpsResult<()> {
        self.validate(samples, width, height, channels)?;
        debug!(
            direction = %self.direction,
            derive_z = self.derive_z,
            apply_bias = self.bias.apply(),
            remove_bias = self.bias.remove(),
            width,
            height,
            channels,
            "Converting pixels"
        );

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            samples
                .par_chunks_mut(width * channels)
                .for_each(|row| self.convert_row(row, channels));
        }

        #[cfg(not(feature = "parallel"))]
        for row in samples.chunks_mut(width * channels) {
            self.convert_row(row, channels);
        }

        Ok(())
    }

    /// Single-threaded variant of [`apply`](Self::apply).
    pub fn apply_serial(
        &self,
        samples: &mut [f32],
        width: usize,
        height: usize,
        channels: usize,
    ) -> OpsResult<()> {
        self.validate(samples, width, height, channels)?;
        self.convert_row(samples, channels);
        Ok(())
    }

    #[inline]
    fn convert_row(&self, row: &mut [f32], channels: usize) {
        for pixel in row.chunks_exact_mut(channels) {
            self.convert_pixel(pixel);
        }
    }

    fn op_name(&self) -> &'static str {
        match self.direction {
            Direction::Forward => "basis -> qlog",
            Direction::Inverse => "qlog -> basis",
        }
    }

    fn validate(
        &self,
        samples: &[f32],
        width: usize,
        height: usize,
        channels: usize,
    ) -> OpsResult<()> {
        trace!(len = samples.len(), width, height, channels, "QLogConverter::validate");
        check_geometry(samples, width, height, channels)?;

        if channels < PIXEL_CHANNELS {
            return Err(OpsError::ChannelCount {
                op: self.op_name(),
                required: PIXEL_CHANNELS,
                actual: channels,
            });
        }

        Ok(())
    }
}

fn check_geometry(samples: &[f32], width: usize, height: usize, channels: usize) -> OpsResult<()> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(
            "width, height, and channels must be > 0".into(),
        ));
    }

    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| OpsError::InvalidDimensions("image dimensions overflow".into()))?;

    if samples.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            samples.len()
        )));
    }

    Ok(())
}

/// Re-interleaves a buffer with `target` channels per pixel.
///
/// Existing channels are copied (truncated if `target` is smaller) and new
/// channels are set to `fill`. Used to give two-channel QLog maps room for
/// the decoded Z channel.
///
/// ```rust
/// use qlog_ops::widen_channels;
///
/// let wide = widen_channels(&[0.1, 0.2, 0.3, 0.4], 2, 3, 0.5);
/// assert_eq!(wide, vec![0.1, 0.2, 0.5, 0.3, 0.4, 0.5]);
/// ```
pub fn widen_channels(samples: &[f32], channels: usize, target: usize, fill: f32) -> Vec<f32> {
    if channels == target || channels == 0 {
        return samples.to_vec();
    }

    let keep = channels.min(target);
    let mut out = Vec::with_capacity(samples.len() / channels * target);
    for pixel in samples.chunks_exact(channels) {
        out.extend_from_slice(&pixel[..keep]);
        out.extend(std::iter::repeat_n(fill, target - keep));
    }
    out
}
