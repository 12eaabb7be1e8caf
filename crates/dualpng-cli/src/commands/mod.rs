//! CLI command implementations

pub mod inspect;
pub mod merge;

use anyhow::{Context, Result};
use dualpng_core::Image;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    dualpng_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}
