//! Error types for session operations.

use crate::params::FieldError;
use dualpng_io::IoError;
use dualpng_ops::OpsError;
use std::fmt::Write as _;
use thiserror::Error;

/// Error type for session and registry operations.
///
/// None of these are fatal to the process; each is reported back to the
/// caller of the operation that produced it.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session with this id is registered.
    #[error("session not found: {0}")]
    NotFound(String),

    /// A session with this id is already registered.
    #[error("session already exists: {0}")]
    AlreadyExists(String),

    /// Merge requested before both sources were uploaded.
    #[error("cannot merge: missing {}", missing_list(.missing))]
    PreconditionFailed {
        /// Slots that are still empty.
        missing: Vec<crate::Slot>,
    },

    /// One or more merge parameters failed to parse.
    #[error("malformed input: {}", field_list(.0))]
    MalformedInput(Vec<FieldError>),

    /// The registry is full and configured to reject new sessions.
    #[error("session limit of {limit} reached")]
    CapacityExceeded {
        /// Configured maximum.
        limit: usize,
    },

    /// Uploaded bytes could not be decoded.
    #[error("decode failure: {0}")]
    Decode(IoError),

    /// A compositing step rejected its input.
    #[error(transparent)]
    Ops(#[from] OpsError),

    /// Encoding or file error.
    #[error("I/O error: {0}")]
    Io(IoError),

    /// Registry configuration could not be read.
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<IoError> for SessionError {
    fn from(e: IoError) -> Self {
        if e.is_bad_input() {
            Self::Decode(e)
        } else {
            Self::Io(e)
        }
    }
}

impl From<serde_yaml::Error> for SessionError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Config(e.to_string())
    }
}

fn missing_list(slots: &[crate::Slot]) -> String {
    slots
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" and ")
}

fn field_list(errors: &[FieldError]) -> String {
    let mut out = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        let _ = write!(out, "{e}");
    }
    out
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
