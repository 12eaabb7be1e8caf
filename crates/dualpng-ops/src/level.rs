//! Channel leveling.
//!
//! Leveling squeezes the full `[0, 255]` range of each colour channel into
//! `[low, high]`:
//!
//! ```text
//! out = round(in / 255 * (high - low)) + low
//! ```
//!
//! Alpha is never touched. Two images leveled into disjoint ranges (for
//! example `0-230` and `230-255`) are what the gAMA trick separates.
//!
//! ```rust
//! use dualpng_core::Image;
//! use dualpng_ops::{level_image, LevelRange};
//!
//! let white = Image::filled(1, 1, [255, 255, 255, 255]);
//! let out = level_image(&white, LevelRange::new(100, 200).unwrap());
//! assert_eq!(out.pixel(0, 0), [200, 200, 200, 255]);
//! ```

use crate::{OpsError, OpsResult};
use dualpng_core::Image;
use tracing::trace;

/// Validated `[low, high]` channel range with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelRange {
    low: u8,
    high: u8,
}

impl LevelRange {
    /// The identity range `[0, 255]`.
    pub const FULL: LevelRange = LevelRange { low: 0, high: 255 };

    /// Creates a range.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvertedRange`] when `low > high`.
    pub fn new(low: u8, high: u8) -> OpsResult<Self> {
        if low > high {
            return Err(OpsError::InvertedRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// Lower bound.
    #[inline]
    pub fn low(&self) -> u8 {
        self.low
    }

    /// Upper bound.
    #[inline]
    pub fn high(&self) -> u8 {
        self.high
    }

    /// Remaps a single channel value into the range.
    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        let span = f64::from(self.high - self.low);
        // Never exceeds `span`, so the sum stays within `high`.
        (f64::from(value) / 255.0 * span).round() as u8 + self.low
    }

    fn lut(&self) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (v, slot) in table.iter_mut().enumerate() {
            *slot = self.apply(v as u8);
        }
        table
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Levels the RGB channels of `img` into `range`; alpha is copied.
pub fn level_image(img: &Image, range: LevelRange) -> Image {
    trace!(low = range.low, high = range.high, "level_image");
    let lut = range.lut();
    img.map_pixels(|[r, g, b, a]| [lut[r as usize], lut[g as usize], lut[b as usize], a])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_range_rejected() {
        assert_eq!(
            LevelRange::new(200, 100),
            Err(OpsError::InvertedRange { low: 200, high: 100 })
        );
        assert!(LevelRange::new(7, 7).is_ok());
    }

    #[test]
    fn test_full_range_identity() {
        for v in 0..=255u8 {
            assert_eq!(LevelRange::FULL.apply(v), v);
        }
    }

    #[test]
    fn test_endpoints() {
        let r = LevelRange::new(230, 255).unwrap();
        assert_eq!(r.apply(0), 230);
        assert_eq!(r.apply(255), 255);

        let r = LevelRange::new(0, 230).unwrap();
        assert_eq!(r.apply(0), 0);
        assert_eq!(r.apply(255), 230);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 128 / 255 * 100 = 50.196...
        let r = LevelRange::new(100, 200).unwrap();
        assert_eq!(r.apply(128), 150);
        // 1 / 255 * 230 = 0.90 -> 1
        assert_eq!(LevelRange::new(0, 230).unwrap().apply(1), 1);
    }

    #[test]
    fn test_degenerate_range_is_constant() {
        let r = LevelRange::new(42, 42).unwrap();
        assert!((0..=255u8).all(|v| r.apply(v) == 42));
    }

    #[test]
    fn test_alpha_untouched() {
        let img = Image::from_rgba(2, 1, vec![255, 0, 128, 7, 10, 20, 30, 0]).unwrap();
        let out = level_image(&img, LevelRange::new(100, 200).unwrap());
        assert_eq!(out.pixel(0, 0), [200, 100, 150, 7]);
        assert_eq!(out.pixel(1, 0)[3], 0);
    }
}
