//! # qlog-core
//!
//! Core types for converting normal maps to and from quaternion-logarithm
//! ("QLog") maps.
//!
//! This crate provides the value types shared by the rest of the workspace:
//!
//! - [`Normal`] - Basis-vector normal (x, y, z)
//! - [`QLog`] - Imaginary part of a quaternion logarithm (u, v)
//! - [`pack_unit`] / [`unpack_unit`] - Affine mapping between [-1, 1] and [0, 1]
//! - [`ConvertConfig`], [`Direction`], [`ConvertJob`] - Immutable run configuration
//! - [`Error`] - Configuration and generic errors
//!
//! ## Crate Structure
//!
//! ```text
//! qlog-core (this crate)
//!    ^
//!    |
//!    +-- qlog-ops (bias curve, forward/inverse converters, dispatcher)
//!    +-- qlog-cli (argument parsing, orchestration)
//! ```
//!
//! ## Conventions
//!
//! All math is single precision. "Epsilon" always means [`f32::EPSILON`],
//! the threshold used by the singularity guards in `qlog-ops`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod normal;

pub use config::{ConvertConfig, ConvertJob, Direction};
pub use error::{Error, Result};
pub use normal::{pack_unit, unpack_unit, z_from_xy, Normal, QLog, QLOG_RANGE};

/// Prelude module for convenient imports.
///
/// ```
/// use qlog_core::prelude::*;
///
/// let config = ConvertConfig::new().with_direction(Direction::Inverse);
/// assert!(config.direction.is_inverse());
/// ```
pub mod prelude {
    pub use crate::config::{ConvertConfig, ConvertJob, Direction};
    pub use crate::error::{Error, Result};
    pub use crate::normal::{pack_unit, unpack_unit, z_from_xy, Normal, QLog, QLOG_RANGE};
}
