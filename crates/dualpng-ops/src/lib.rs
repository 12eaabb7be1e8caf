//! # dualpng-ops
//!
//! The compositing engine behind dual-gamma PNGs.
//!
//! A dual PNG interleaves two images whose channel values live in disjoint
//! ranges. Viewers that honour the file's gAMA chunk stretch one range
//! into view; viewers that ignore it show the other. Every operation here
//! is a pure function: inputs are borrowed, a new [`Image`] is returned.
//!
//! # Modules
//!
//! - [`level`] - Channel leveling into a `[low, high]` sub-range
//! - [`brightness`] - Brightness scaling with clamping
//! - [`mask`] - Mask matrices tiled over a canvas
//! - [`merge`] - Checkerboard and masked two-image merge
//! - [`resize`] - Resampling filters and the [`Resizer`] seam
//!
//! # Example
//!
//! ```rust
//! use dualpng_core::Image;
//! use dualpng_ops::{level_image, merge_images, LevelRange};
//!
//! let light = Image::filled(4, 4, [255, 255, 255, 255]);
//! let dark = Image::filled(4, 4, [0, 0, 0, 255]);
//!
//! let a = level_image(&light, LevelRange::new(0, 230).unwrap());
//! let b = level_image(&dark, LevelRange::new(230, 255).unwrap());
//! let merged = merge_images(&a, &b, None);
//! assert_eq!(merged.dimensions(), (4, 4));
//! ```
//!
//! [`Image`]: dualpng_core::Image

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod brightness;
pub mod level;
pub mod mask;
pub mod merge;
pub mod resize;

pub use brightness::scale_brightness;
pub use error::{OpsError, OpsResult};
pub use level::{level_image, LevelRange};
pub use mask::{create_mask, MaskMatrix};
pub use merge::merge_images;
pub use resize::{Filter, LanczosResizer, Resizer, MAX_DIMENSION};
