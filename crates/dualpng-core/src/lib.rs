//! # dualpng-core
//!
//! Core types shared by every dualpng crate.
//!
//! - [`Image`] - Immutable-by-convention RGBA8 buffer with cheap clones
//! - [`Rect`] - Pixel bounds anchored at an origin
//! - [`Error`] - Buffer construction errors
//!
//! ## Crate Structure
//!
//! ```text
//! dualpng-core (this crate)
//!    ^
//!    |
//!    +-- dualpng-ops (level, brightness, mask, merge, resize)
//!    +-- dualpng-io (PNG/JPEG/GIF decode, gAMA PNG encode)
//!    +-- dualpng-session (sessions and registry)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod rect;

pub use error::{Error, Result};
pub use image::{Image, Rgba, CHANNELS, TRANSPARENT};
pub use rect::Rect;
