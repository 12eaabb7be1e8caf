//! Brightness scaling.

use crate::{OpsError, OpsResult};
use dualpng_core::Image;
use tracing::trace;

/// Multiplies R, G and B by `scale`, clamping to `[0, 255]`.
///
/// Alpha is copied. A scale of `1.0` reproduces the input exactly.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if `scale` is negative, NaN or infinite.
///
/// ```rust
/// use dualpng_core::Image;
/// use dualpng_ops::scale_brightness;
///
/// let grey = Image::filled(1, 1, [100, 100, 100, 255]);
/// let out = scale_brightness(&grey, 1.5).unwrap();
/// assert_eq!(out.pixel(0, 0), [150, 150, 150, 255]);
/// ```
pub fn scale_brightness(img: &Image, scale: f64) -> OpsResult<Image> {
    if !scale.is_finite() || scale < 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "brightness scale must be a non-negative number, got {scale}"
        )));
    }
    trace!(scale, "scale_brightness");

    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        *slot = (v as f64 * scale).round().min(255.0) as u8;
    }
    Ok(img.map_pixels(|[r, g, b, a]| [lut[r as usize], lut[g as usize], lut[b as usize], a]))
}
