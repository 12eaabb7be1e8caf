//! RGBA8 image buffer.
//!
//! [`Image`] is the value every compositing step reads and produces. It is
//! immutable by convention: operations build a new image instead of
//! editing one in place, and the pixel buffer sits behind an [`Arc`] so
//! cloning an image (for example to hand a session's source to a reader)
//! never copies pixel data.
//!
//! # Memory Layout
//!
//! Pixels are stored row-major, top-to-bottom, with interleaved channels:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//! ```
//!
//! # Usage
//!
//! ```rust
//! use dualpng_core::Image;
//!
//! let img = Image::filled(4, 2, [255, 0, 0, 255]);
//! assert_eq!(img.pixel(3, 1), [255, 0, 0, 255]);
//! assert_eq!(img.get_pixel(4, 0), None);
//! ```

use crate::{Error, Rect, Result};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// One RGBA8 pixel.
pub type Rgba = [u8; CHANNELS];

/// Fully transparent black, the value of any pixel outside an image.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Owned RGBA8 image with a shared pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    /// Pixel data buffer (Arc for cheap cloning)
    data: Arc<Vec<u8>>,
    width: u32,
    height: u32,
}

impl Image {
    /// Creates a transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Creates an image where every pixel has the same value.
    ///
    /// ```rust
    /// use dualpng_core::Image;
    ///
    /// let white = Image::filled(500, 500, [255, 255, 255, 255]);
    /// assert_eq!(white.width(), 500);
    /// ```
    pub fn filled(width: u32, height: u32, pixel: Rgba) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * CHANNELS);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Creates an image from interleaved RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len()` is not
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height, CHANNELS)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} bytes, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Creates an opaque image from interleaved RGB bytes.
    pub fn from_rgb(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = buffer_len(width, height, 3)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} RGB bytes, got {}", expected, data.len()),
            ));
        }
        let rgba = data
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect();
        Self::from_rgba(width, height, rgba)
    }

    /// Builds an image by evaluating `f` at every coordinate.
    ///
    /// Rows are filled in parallel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> Rgba + Sync,
    {
        let row_len = width as usize * CHANNELS;
        let mut data = vec![0u8; row_len * height as usize];
        if row_len > 0 {
            data.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                        px.copy_from_slice(&f(x as u32, y as u32));
                    }
                });
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Produces a new image by applying `f` to every pixel.
    ///
    /// The source is left untouched.
    pub fn map_pixels<F>(&self, f: F) -> Self
    where
        F: Fn(Rgba) -> Rgba + Sync,
    {
        let mut data = self.data.as_ref().clone();
        data.par_chunks_mut(CHANNELS).for_each(|px| {
            let out = f([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        });
        Self {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns a rectangle covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the raw RGBA bytes.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its RGBA bytes, copying only when
    /// the buffer is still shared.
    pub fn into_raw(self) -> Vec<u8> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| shared.as_ref().clone())
    }

    /// Returns `true` if both images share the same pixel buffer.
    #[inline]
    pub fn shares_buffer(&self, other: &Image) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} image",
            self.width,
            self.height
        );
        let offset = self.pixel_offset(x, y);
        let mut px = TRANSPARENT;
        px.copy_from_slice(&self.data[offset..offset + CHANNELS]);
        px
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Returns the pixel at (x, y), or [`TRANSPARENT`] outside the image.
    #[inline]
    pub fn pixel_or_transparent(&self, x: u32, y: u32) -> Rgba {
        self.get_pixel(x, y).unwrap_or(TRANSPARENT)
    }

    /// Iterates all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))
}
