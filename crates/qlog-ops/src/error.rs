//! Error types for pixel dispatch.

use thiserror::Error;

/// Error type for buffer-level conversion.
///
/// Per-pixel math never fails; only malformed buffers are rejected.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Buffer length does not match the stated geometry.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Too few channels for the requested direction.
    #[error("{op} needs at least {required} channels, image has {actual}")]
    ChannelCount {
        /// Operation name
        op: &'static str,
        /// Minimum channel count
        required: usize,
        /// Channel count of the buffer
        actual: usize,
    },
}

/// Result type for buffer-level conversion.
pub type OpsResult<T> = Result<T, OpsError>;
