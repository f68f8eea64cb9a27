//! Error types for qlog-core.
//!
//! Numerical degeneracies (poles, zero-length vectors) are never errors;
//! the converters resolve them locally. The only failures at this level are
//! invalid run configurations.
//!
//! # Usage
//!
//! ```rust
//! use qlog_core::{Error, Result};
//!
//! fn check_paths(count: usize) -> Result<()> {
//!     if count != 2 {
//!         return Err(Error::configuration("need one input and one output"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_paths(3).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a conversion run.
#[derive(Debug, Error)]
pub enum Error {
    /// The run configuration is unusable (wrong file count, non-finite bias).
    ///
    /// Always reported before any image I/O is attempted.
    #[error("invalid configuration: {reason}")]
    Configuration {
        /// What is wrong with the configuration
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::Configuration`] error.
    #[inline]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = Error::configuration("exactly one input and one output");
        let msg = err.to_string();
        assert!(msg.starts_with("invalid configuration"));
        assert!(msg.contains("exactly one input"));
        assert!(err.is_configuration_error());
    }
}
