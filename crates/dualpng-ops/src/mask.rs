//! Mask matrices and tiled alpha masks.
//!
//! A [`MaskMatrix`] is a small grid of weights repeated across a canvas to
//! decide, per pixel, how much of the first image shows over the second.
//!
//! # Weight semantics
//!
//! Weights are continuous: a cell value `v` becomes mask alpha
//! `round(clamp(v, 0, 1) * 255)`. A matrix of zeros and ones therefore
//! behaves like a binary mask (1 = first image, 0 = second image), and
//! fractional weights blend the two.
//!
//! ```rust
//! use dualpng_core::Rect;
//! use dualpng_ops::{create_mask, MaskMatrix};
//!
//! let m = MaskMatrix::checkerboard();
//! let mask = create_mask(&m, Rect::from_size(3, 3));
//! assert_eq!(mask.pixel(1, 1)[3], 0);
//! assert_eq!(mask.pixel(2, 2)[3], 255);
//! ```

use crate::{OpsError, OpsResult};
use dualpng_core::{Image, Rect};
use tracing::trace;

/// Rectangular, non-empty grid of blend weights.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskMatrix {
    rows: Vec<Vec<f64>>,
    cols: usize,
}

impl MaskMatrix {
    /// Validates and wraps a row-major weight grid.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidMask`] if the grid has no rows, an empty or
    /// ragged row, or a NaN/infinite weight.
    pub fn new(rows: Vec<Vec<f64>>) -> OpsResult<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(OpsError::InvalidMask("mask must have at least one cell".into()));
        }
        if let Some(i) = rows.iter().position(|row| row.len() != cols) {
            return Err(OpsError::InvalidMask(format!(
                "row {} has {} cells, expected {}",
                i,
                rows[i].len(),
                cols
            )));
        }
        if rows.iter().flatten().any(|v| !v.is_finite()) {
            return Err(OpsError::InvalidMask("weights must be finite".into()));
        }
        Ok(Self { rows, cols })
    }

    /// `[[1, 1], [1, 0]]`: three pixels of the first image for every one
    /// of the second.
    pub fn checkerboard() -> Self {
        Self {
            rows: vec![vec![1.0, 1.0], vec![1.0, 0.0]],
            cols: 2,
        }
    }

    /// A 1x1 matrix holding `weight`.
    pub fn uniform(weight: f64) -> OpsResult<Self> {
        Self::new(vec![vec![weight]])
    }

    /// Number of columns in one tile.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows in one tile.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Raw weight at tile cell (col, row).
    #[inline]
    pub fn weight(&self, col: usize, row: usize) -> f64 {
        self.rows[row][col]
    }

    /// Mask alpha for tile cell (col, row).
    #[inline]
    pub fn alpha(&self, col: usize, row: usize) -> u8 {
        (self.weight(col, row).clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Tiles `matrix` over `bounds` and returns an alpha mask the size of
/// `bounds`.
///
/// Mask pixel (i, j) corresponds to canvas pixel
/// `(bounds.x + i, bounds.y + j)`; tiling starts at the bounds origin and
/// the last row and column of tiles are clipped at the far edge. RGB is
/// always zero.
pub fn create_mask(matrix: &MaskMatrix, bounds: Rect) -> Image {
    trace!(
        cols = matrix.cols(),
        rows = matrix.rows(),
        width = bounds.width,
        height = bounds.height,
        "create_mask"
    );
    let cols = matrix.cols();
    let rows = matrix.rows();
    Image::from_fn(bounds.width, bounds.height, |i, j| {
        [0, 0, 0, matrix.alpha(i as usize % cols, j as usize % rows)]
    })
}
