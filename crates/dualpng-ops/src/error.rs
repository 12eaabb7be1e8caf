//! Error types for compositing operations.

use thiserror::Error;

/// Error type for compositing operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Leveling range with `low > high`.
    #[error("inverted level range: low {low} > high {high}")]
    InvertedRange {
        /// Requested lower bound.
        low: u8,
        /// Requested upper bound.
        high: u8,
    },

    /// Mask matrix is empty, ragged, or holds a non-finite weight.
    #[error("invalid mask: {0}")]
    InvalidMask(String),
}

/// Result type for compositing operations.
pub type OpsResult<T> = Result<T, OpsError>;
