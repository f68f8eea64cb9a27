//! Conversion run configuration.
//!
//! A [`ConvertConfig`] is built once from the command line and then passed
//! by value into the converters. Nothing mutates it after construction.
//!
//! # Example
//!
//! ```rust
//! use qlog_core::{ConvertConfig, ConvertJob, Direction};
//!
//! let config = ConvertConfig::new()
//!     .with_direction(Direction::Forward)
//!     .with_derive_z(true)
//!     .with_bias(0.5);
//!
//! let job = ConvertJob::new(vec!["normal.png".into(), "qlog.png".into()], config).unwrap();
//! assert_eq!(job.output.to_str(), Some("qlog.png"));
//! ```

use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Which way the conversion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Basis-vector normal map to QLog map.
    #[default]
    Forward,
    /// QLog map to basis-vector normal map.
    Inverse,
}

impl Direction {
    /// Returns `true` for [`Direction::Inverse`].
    #[inline]
    pub fn is_inverse(self) -> bool {
        matches!(self, Self::Inverse)
    }

    /// Minimum channel count of an input image for this direction.
    #[inline]
    pub fn min_input_channels(self) -> usize {
        match self {
            Self::Forward => 3,
            Self::Inverse => 2,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("basis -> qlog"),
            Self::Inverse => f.write_str("qlog -> basis"),
        }
    }
}

/// Immutable parameters of one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConvertConfig {
    /// Conversion direction.
    pub direction: Direction,
    /// Recompute Z from X and Y before encoding. Forward only.
    pub derive_z: bool,
    /// Precision bias. Positive values concentrate precision near the
    /// unperturbed normal, negative values away from it.
    pub bias: f32,
}

impl ConvertConfig {
    /// Creates the default configuration: forward, no Z derivation, bias 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Enables or disables Z derivation.
    pub fn with_derive_z(mut self, derive_z: bool) -> Self {
        self.derive_z = derive_z;
        self
    }

    /// Sets the precision bias.
    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    /// Checks the configuration for fatal problems.
    ///
    /// Only non-finite bias values are rejected; any finite bias yields
    /// well-defined, positive curve exponents.
    pub fn validate(&self) -> Result<()> {
        if !self.bias.is_finite() {
            return Err(Error::configuration(format!(
                "bias must be a finite number, got {}",
                self.bias
            )));
        }
        Ok(())
    }

    /// Non-fatal notices about this configuration.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.derive_z && self.direction.is_inverse() {
            warnings.push(
                "derive-z has no effect when converting from QLog maps to basis normal maps",
            );
        }
        warnings
    }
}

/// A validated conversion request: one input, one output, one config.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertJob {
    /// Image to read.
    pub input: PathBuf,
    /// Image to write.
    pub output: PathBuf,
    /// Conversion parameters.
    pub config: ConvertConfig,
}

impl ConvertJob {
    /// Builds a job from the positional file list.
    ///
    /// Exactly two paths are required (input, then output) and the config
    /// must pass [`ConvertConfig::validate`]. Fails with
    /// [`Error::Configuration`] otherwise.
    pub fn new(files: Vec<PathBuf>, config: ConvertConfig) -> Result<Self> {
        if files.len() != 2 {
            return Err(Error::configuration(format!(
                "must have exactly one input and one output filename, got {} file(s)",
                files.len()
            )));
        }
        config.validate()?;

        let mut files = files.into_iter();
        match (files.next(), files.next()) {
            (Some(input), Some(output)) => Ok(Self {
                input,
                output,
                config,
            }),
            _ => Err(Error::configuration("missing input or output filename")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_defaults() {
        let config = ConvertConfig::new();
        assert_eq!(config.direction, Direction::Forward);
        assert!(!config.derive_z);
        assert_eq!(config.bias, 0.0);
        assert!(config.validate().is_ok());
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_job_requires_two_paths() {
        let config = ConvertConfig::new();
        let cases: [&[&str]; 3] = [&[], &["a.png"], &["a.png", "b.png", "c.png"]];
        for names in cases {
            let err = ConvertJob::new(paths(names), config).unwrap_err();
            assert!(err.is_configuration_error());
        }

        let job = ConvertJob::new(paths(&["in.exr", "out.exr"]), config).unwrap();
        assert_eq!(job.input, PathBuf::from("in.exr"));
        assert_eq!(job.output, PathBuf::from("out.exr"));
    }

    #[test]
    fn test_non_finite_bias_rejected() {
        for bias in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let config = ConvertConfig::new().with_bias(bias);
            assert!(config.validate().unwrap_err().is_configuration_error());
            assert!(ConvertJob::new(paths(&["a.png", "b.png"]), config).is_err());
        }
        assert!(ConvertConfig::new().with_bias(-3.0).validate().is_ok());
    }

    #[test]
    fn test_derive_z_inverse_is_warning_only() {
        let config = ConvertConfig::new()
            .with_direction(Direction::Inverse)
            .with_derive_z(true);
        assert!(config.validate().is_ok());
        assert_eq!(config.warnings().len(), 1);

        let forward = config.with_direction(Direction::Forward);
        assert!(forward.warnings().is_empty());
    }

    #[test]
    fn test_min_input_channels() {
        assert_eq!(Direction::Forward.min_input_channels(), 3);
        assert_eq!(Direction::Inverse.min_input_channels(), 2);
    }
}
