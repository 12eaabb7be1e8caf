//! Image resize and resampling.
//!
//! Provides separable two-pass resampling with the usual filter family.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - Fastest, no interpolation (blocky)
//! - [`Filter::Bilinear`] - Linear interpolation (smooth but blurry)
//! - [`Filter::Bicubic`] - Mitchell-Netravali cubic
//! - [`Filter::Lanczos3`] - Windowed sinc, used for merges
//!
//! Target sizes follow the merge convention: a zero width or height is
//! derived from the other dimension so the aspect ratio is preserved.
//!
//! ```rust
//! use dualpng_core::Image;
//! use dualpng_ops::resize::{resize, Filter};
//!
//! let src = Image::filled(64, 32, [10, 20, 30, 255]);
//! let dst = resize(&src, 128, 0, Filter::Lanczos3).unwrap();
//! assert_eq!(dst.dimensions(), (128, 64));
//! ```

use crate::{OpsError, OpsResult};
use dualpng_core::{Image, CHANNELS};
use rayon::prelude::*;
use tracing::debug;

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor (fastest, no interpolation).
    Nearest,
    /// Bilinear interpolation (smooth, fast).
    Bilinear,
    /// Bicubic interpolation (sharper than bilinear).
    Bicubic,
    /// Lanczos-3 (high quality, best for downscaling).
    #[default]
    Lanczos3,
}

impl Filter {
    /// Returns the support radius for this filter.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the filter kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Filter::Nearest => nearest_weight(x),
            Filter::Bilinear => bilinear_weight(x),
            Filter::Bicubic => bicubic_weight(x),
            Filter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "box" => Ok(Filter::Nearest),
            "bilinear" | "linear" => Ok(Filter::Bilinear),
            "bicubic" | "mitchell" => Ok(Filter::Bicubic),
            "lanczos" | "lanczos3" => Ok(Filter::Lanczos3),
            other => Err(OpsError::InvalidParameter(format!("unknown filter: {other}"))),
        }
    }
}

#[inline]
fn nearest_weight(x: f32) -> f32 {
    // Half-open so a sample centered between two source pixels picks one.
    if (-0.5..0.5).contains(&x) { 1.0 } else { 0.0 }
}

#[inline]
fn bilinear_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Mitchell-Netravali with B = C = 1/3.
#[inline]
fn bicubic_weight(x: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;

    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Largest width or height [`resize`] will produce.
pub const MAX_DIMENSION: u32 = 16_384;

/// Resolves a requested size against a source size.
///
/// A zero dimension is derived from the other one, preserving aspect
/// ratio (never below 1). Both zero keeps the source size.
///
/// ```rust
/// use dualpng_ops::resize::target_dimensions;
///
/// assert_eq!(target_dimensions(1920, 1080, 1024, 0), (1024, 576));
/// assert_eq!(target_dimensions(1920, 1080, 0, 540), (960, 540));
/// assert_eq!(target_dimensions(1920, 1080, 0, 0), (1920, 1080));
/// ```
pub fn target_dimensions(src_w: u32, src_h: u32, width: u32, height: u32) -> (u32, u32) {
    match (width, height) {
        (0, 0) => (src_w, src_h),
        (w, 0) => {
            let h = (f64::from(src_h) * f64::from(w) / f64::from(src_w.max(1))).round();
            (w, (h as u32).max(1))
        }
        (0, h) => {
            let w = (f64::from(src_w) * f64::from(h) / f64::from(src_h.max(1))).round();
            ((w as u32).max(1), h)
        }
        (w, h) => (w, h),
    }
}

/// Resizes `img` to `width` x `height` with `filter`.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if the source is empty or the target
/// exceeds [`MAX_DIMENSION`] on either axis.
pub fn resize(img: &Image, width: u32, height: u32, filter: Filter) -> OpsResult<Image> {
    if img.is_empty() {
        return Err(OpsError::InvalidDimensions(
            "cannot resize an empty image".into(),
        ));
    }
    let (src_w, src_h) = img.dimensions();
    let (dst_w, dst_h) = target_dimensions(src_w, src_h, width, height);
    if dst_w > MAX_DIMENSION || dst_h > MAX_DIMENSION {
        return Err(OpsError::InvalidDimensions(format!(
            "target {dst_w}x{dst_h} exceeds the {MAX_DIMENSION} pixel limit"
        )));
    }
    if (dst_w, dst_h) == (src_w, src_h) {
        return Ok(img.clone());
    }
    debug!(src_w, src_h, dst_w, dst_h, ?filter, "resizing");

    let src: Vec<f32> = img.as_raw().iter().map(|&v| f32::from(v)).collect();
    let (src_w, src_h) = (src_w as usize, src_h as usize);
    let (dst_w, dst_h) = (dst_w as usize, dst_h as usize);

    // Two-pass separable resize: horizontal then vertical
    let temp = resize_horizontal(&src, src_w, src_h, dst_w, filter);
    let result = resize_vertical(&temp, dst_w, src_h, dst_h, filter);

    let bytes = result
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    Image::from_rgba(dst_w as u32, dst_h as u32, bytes)
        .map_err(|e| OpsError::InvalidDimensions(e.to_string()))
}

/// Horizontal resize pass.
fn resize_horizontal(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    filter: Filter,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h * CHANNELS];
    let scale = src_w as f32 / dst_w as f32;
    let support = filter.support() * scale.max(1.0);

    dst.par_chunks_mut(dst_w * CHANNELS)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..dst_w {
                // Map destination x to source x
                let center = (x as f32 + 0.5) * scale - 0.5;
                let left = ((center - support).floor() as isize).max(0) as usize;
                let right = ((center + support).ceil().max(0.0) as usize).min(src_w - 1);

                let mut sum = [0.0f32; CHANNELS];
                let mut weight_sum = 0.0f32;

                for sx in left..=right {
                    let w = filter.weight((sx as f32 - center) / scale.max(1.0));
                    weight_sum += w;
                    let src_idx = (y * src_w + sx) * CHANNELS;
                    for c in 0..CHANNELS {
                        sum[c] += src[src_idx + c] * w;
                    }
                }

                if weight_sum == 0.0 {
                    let src_idx = (y * src_w + nearest_index(center, src_w)) * CHANNELS;
                    row[x * CHANNELS..(x + 1) * CHANNELS]
                        .copy_from_slice(&src[src_idx..src_idx + CHANNELS]);
                } else {
                    for c in 0..CHANNELS {
                        row[x * CHANNELS + c] = sum[c] / weight_sum;
                    }
                }
            }
        });

    dst
}

/// Vertical resize pass.
fn resize_vertical(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    dst_h: usize,
    filter: Filter,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; src_w * dst_h * CHANNELS];
    let scale = src_h as f32 / dst_h as f32;
    let support = filter.support() * scale.max(1.0);

    dst.par_chunks_mut(src_w * CHANNELS)
        .enumerate()
        .for_each(|(y, row)| {
            // Map destination y to source y
            let center = (y as f32 + 0.5) * scale - 0.5;
            let top = ((center - support).floor() as isize).max(0) as usize;
            let bottom = ((center + support).ceil().max(0.0) as usize).min(src_h - 1);

            let mut weights: Vec<(usize, f32)> = (top..=bottom)
                .map(|sy| (sy, filter.weight((sy as f32 - center) / scale.max(1.0))))
                .collect();
            let mut weight_sum: f32 = weights.iter().map(|&(_, w)| w).sum();
            if weight_sum == 0.0 {
                weights = vec![(nearest_index(center, src_h), 1.0)];
                weight_sum = 1.0;
            }

            for x in 0..src_w {
                for c in 0..CHANNELS {
                    let sum: f32 = weights
                        .iter()
                        .map(|&(sy, w)| src[(sy * src_w + x) * CHANNELS + c] * w)
                        .sum();
                    row[x * CHANNELS + c] = sum / weight_sum;
                }
            }
        });

    dst
}

/// Source index closest to a sample center, clamped to the source.
#[inline]
fn nearest_index(center: f32, len: usize) -> usize {
    (center.round().max(0.0) as usize).min(len - 1)
}

/// The seam through which sessions resample their sources.
///
/// Implementations return a new image; `0` in either dimension means
/// "derive from the other to keep the aspect ratio".
pub trait Resizer: Send + Sync {
    /// Resamples `img` to the requested size.
    fn resize(&self, img: &Image, width: u32, height: u32) -> OpsResult<Image>;
}

/// Default [`Resizer`] backed by [`resize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LanczosResizer {
    filter: Filter,
}

impl LanczosResizer {
    /// Lanczos-3 resizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizer using a different filter.
    pub fn with_filter(filter: Filter) -> Self {
        Self { filter }
    }
}

impl Resizer for LanczosResizer {
    fn resize(&self, img: &Image, width: u32, height: u32) -> OpsResult<Image> {
        resize(img, width, height, self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_weights() {
        assert!((Filter::Nearest.weight(0.0) - 1.0).abs() < 0.01);
        assert!((Filter::Nearest.weight(0.6) - 0.0).abs() < 0.01);
        assert_eq!(Filter::Nearest.weight(-0.5), 1.0);
        assert_eq!(Filter::Nearest.weight(0.5), 0.0);
        assert!((Filter::Bilinear.weight(0.5) - 0.5).abs() < 0.01);
        assert!((Filter::Lanczos3.weight(0.0) - 1.0).abs() < 0.01);
        assert_eq!(Filter::Lanczos3.weight(3.5), 0.0);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("Lanczos".parse::<Filter>().unwrap(), Filter::Lanczos3);
        assert_eq!("box".parse::<Filter>().unwrap(), Filter::Nearest);
        assert!("sinc".parse::<Filter>().is_err());
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let src = Image::filled(7, 5, [40, 80, 120, 255]);
        for filter in [Filter::Nearest, Filter::Bilinear, Filter::Bicubic, Filter::Lanczos3] {
            let dst = resize(&src, 13, 3, filter).unwrap();
            assert_eq!(dst.dimensions(), (13, 3));
            for (_, _, px) in dst.pixels() {
                assert_eq!(px, [40, 80, 120, 255], "{filter:?}");
            }
        }
    }

    #[test]
    fn test_nearest_upscale_has_no_holes() {
        // 2 -> 3 puts the middle sample exactly between both source pixels.
        let px = [200, 100, 50, 255];
        for (w, h, dw, dh) in [(2, 1, 3, 1), (1, 2, 1, 3), (2, 2, 3, 3), (4, 1, 6, 1)] {
            let dst = resize(&Image::filled(w, h, px), dw, dh, Filter::Nearest).unwrap();
            assert_eq!(dst.dimensions(), (dw, dh));
            for (x, y, got) in dst.pixels() {
                assert_eq!(got, px, "{w}x{h} -> {dw}x{dh} at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_nearest_picks_a_source_pixel() {
        let src = Image::from_fn(2, 1, |x, _| {
            if x == 0 { [255, 0, 0, 255] } else { [0, 0, 255, 255] }
        });
        let dst = resize(&src, 3, 1, Filter::Nearest).unwrap();
        assert_eq!(dst.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(dst.pixel(2, 0), [0, 0, 255, 255]);
        let middle = dst.pixel(1, 0);
        assert!(middle == src.pixel(0, 0) || middle == src.pixel(1, 0), "{middle:?}");
    }

    #[test]
    fn test_oversized_target_rejected() {
        let src = Image::filled(1, 1, [1, 1, 1, 255]);
        for (w, h) in [(MAX_DIMENSION + 1, 1), (1, 4_000_000_000), (4_000_000_000, 0)] {
            assert!(matches!(
                resize(&src, w, h, Filter::Nearest),
                Err(OpsError::InvalidDimensions(_))
            ));
        }
        // Aspect derivation can push the other axis over the limit.
        let tall = Image::filled(1, 100, [1, 1, 1, 255]);
        assert!(resize(&tall, 200, 0, Filter::Nearest).is_err());
        assert_eq!(
            resize(&src, MAX_DIMENSION, 1, Filter::Nearest).unwrap().width(),
            MAX_DIMENSION
        );
    }

    #[test]
    fn test_same_size_is_shared() {
        let src = Image::filled(4, 4, [1, 2, 3, 4]);
        let dst = resize(&src, 4, 0, Filter::Lanczos3).unwrap();
        assert!(dst.shares_buffer(&src));
    }

    #[test]
    fn test_aspect_preserved() {
        assert_eq!(target_dimensions(100, 50, 10, 0), (10, 5));
        assert_eq!(target_dimensions(100, 50, 0, 10), (20, 10));
        assert_eq!(target_dimensions(1000, 1, 10, 0), (10, 1));
    }

    #[test]
    fn test_empty_source_rejected() {
        let src = Image::new(0, 3);
        assert!(matches!(
            resize(&src, 2, 2, Filter::Bilinear),
            Err(OpsError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_resizer_trait_object() {
        let resizer: Box<dyn Resizer> = Box::new(LanczosResizer::new());
        let out = resizer.resize(&Image::filled(8, 4, [9, 9, 9, 255]), 4, 0).unwrap();
        assert_eq!(out.dimensions(), (4, 2));
    }
}
