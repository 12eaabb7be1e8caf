//! Error types for dualpng-core operations.
//!
//! # Usage
//!
//! ```rust
//! use dualpng_core::{Error, Image, Result};
//!
//! fn solid(width: u32, height: u32) -> Result<Image> {
//!     if width == 0 || height == 0 {
//!         return Err(Error::invalid_dimensions(width, height, "empty image"));
//!     }
//!     Ok(Image::filled(width, height, [0, 0, 0, 255]))
//! }
//!
//! assert!(solid(0, 4).is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building image buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer length does not match the requested dimensions, or the
    /// dimensions overflow.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}
