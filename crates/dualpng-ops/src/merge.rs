//! Two-image merge.
//!
//! The output canvas is the componentwise maximum of both input sizes, so
//! the images need not match. Wherever a source does not cover a canvas
//! pixel it reads as transparent black.
//!
//! # Modes
//!
//! - **Checkerboard** (no mask): pixel (x, y) comes from the first image
//!   when `x` is even or `y` is even, otherwise from the second. Three of
//!   every four pixels belong to the first image; the gAMA illusion is
//!   tuned around that ratio.
//! - **Masked**: the second image is the base layer and the first is
//!   composited over it with the tiled mask alpha `a`:
//!   `out = first * a + base * (1 - a)`, applied to all four channels.
//!
//! ```rust
//! use dualpng_core::Image;
//! use dualpng_ops::merge_images;
//!
//! let white = Image::filled(2, 2, [255, 255, 255, 255]);
//! let black = Image::filled(2, 2, [0, 0, 0, 255]);
//! let out = merge_images(&white, &black, None);
//! assert_eq!(out.pixel(1, 1), [0, 0, 0, 255]);
//! assert_eq!(out.pixel(1, 0), [255, 255, 255, 255]);
//! ```

use crate::mask::{create_mask, MaskMatrix};
use dualpng_core::{Image, Rgba};
use tracing::debug;

/// Blends `fg` over `bg` with mask alpha `alpha` on every channel.
///
/// Exact at the extremes: `alpha == 255` yields `fg`, `alpha == 0` yields
/// `bg`.
#[inline]
pub fn over_masked_pixel(fg: Rgba, bg: Rgba, alpha: u8) -> Rgba {
    let a = u32::from(alpha);
    let inv = 255 - a;
    let mix = |f: u8, b: u8| ((u32::from(f) * a + u32::from(b) * inv + 127) / 255) as u8;
    [
        mix(fg[0], bg[0]),
        mix(fg[1], bg[1]),
        mix(fg[2], bg[2]),
        mix(fg[3], bg[3]),
    ]
}

/// Returns `true` where the checkerboard merge takes the first image.
#[inline]
pub fn takes_first(x: u32, y: u32) -> bool {
    x % 2 == 0 || y % 2 == 0
}

/// Merges `img1` and `img2` into a new image.
///
/// See the [module docs](self) for the checkerboard and masked rules.
pub fn merge_images(img1: &Image, img2: &Image, mask: Option<&MaskMatrix>) -> Image {
    let canvas = img1.bounds().union_size(&img2.bounds());
    debug!(
        width = canvas.width,
        height = canvas.height,
        masked = mask.is_some(),
        "merging images"
    );

    match mask {
        None => Image::from_fn(canvas.width, canvas.height, |x, y| {
            if takes_first(x, y) {
                img1.pixel_or_transparent(x, y)
            } else {
                img2.pixel_or_transparent(x, y)
            }
        }),
        Some(matrix) => {
            let alpha = create_mask(matrix, canvas);
            Image::from_fn(canvas.width, canvas.height, |x, y| {
                over_masked_pixel(
                    img1.pixel_or_transparent(x, y),
                    img2.pixel_or_transparent(x, y),
                    alpha.pixel(x, y)[3],
                )
            })
        }
    }
}
