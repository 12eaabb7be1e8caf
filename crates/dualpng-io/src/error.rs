//! Error types for image decoding and encoding.

use std::io;
use thiserror::Error;

/// Codec or file error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input is not one of the recognized formats, or its codec is
    /// compiled out.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Recognized format, but the bytes could not be decoded.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The encoder rejected the image.
    #[error("encode error: {0}")]
    EncodeError(String),
}

impl IoError {
    /// True for failures caused by the input bytes rather than the
    /// filesystem or the encoder.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_) | Self::DecodeError(_))
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
