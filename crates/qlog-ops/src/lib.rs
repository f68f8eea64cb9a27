//! # qlog-ops
//!
//! Conversion between basis-vector normal maps and quaternion-logarithm
//! ("QLog") maps.
//!
//! A QLog map stores, per pixel, the imaginary part of the logarithm of the
//! rotation that takes +Z to the surface normal. Unlike XYZ normals, these
//! two channels can be blended and added linearly with results close to
//! proper spherical interpolation and rotation composition.
//!
//! # Modules
//!
//! - [`bias`] - Precision bias curve ([`Bias`])
//! - [`forward`] - Basis normal to QLog
//! - [`inverse`] - QLog to basis normal
//! - [`dispatch`] - Whole-buffer conversion ([`QLogConverter`])
//!
//! # Example
//!
//! ```rust
//! use qlog_core::{ConvertConfig, Direction};
//! use qlog_ops::QLogConverter;
//!
//! let config = ConvertConfig::new().with_bias(0.5);
//! let mut pixel = [1.0, 0.5, 0.5];
//!
//! QLogConverter::new(&config).convert_pixel(&mut pixel);
//! assert!((pixel[0] - 1.0).abs() < 1e-5);
//!
//! let inverse = config.with_direction(Direction::Inverse);
//! QLogConverter::new(&inverse).convert_pixel(&mut pixel);
//! assert!((pixel[0] - 1.0).abs() < 1e-5);
//! assert!((pixel[2] - 0.5).abs() < 1e-5);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - Convert rows on the rayon thread pool (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod bias;
pub mod dispatch;
pub mod forward;
pub mod inverse;

pub use bias::Bias;
pub use dispatch::{widen_channels, QLogConverter, PIXEL_CHANNELS};
pub use error::{OpsError, OpsResult};
pub use forward::{encode_pixel, to_qlog, QLOG_FILL};
pub use inverse::{decode_pixel, from_qlog};
