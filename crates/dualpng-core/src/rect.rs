//! Pixel bounds for images and masks.
//!
//! All coordinates use the standard image convention: origin at the
//! top-left, X to the right, Y downward.
//!
//! ```rust
//! use dualpng_core::Rect;
//!
//! let rect = Rect::new(10, 20, 100, 50);
//! assert!(rect.contains(15, 25));
//! assert!(!rect.contains(5, 25));
//! assert_eq!(rect.right(), 110);
//! ```

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// A rectangle with zero width or height is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from origin (0, 0) with given dimensions.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// X coordinate one past the right edge.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Y coordinate one past the bottom edge.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if (px, py) lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Origin-anchored rectangle whose size is the componentwise maximum
    /// of both sizes.
    ///
    /// This is the canvas used when merging two images that do not share
    /// dimensions.
    ///
    /// ```rust
    /// use dualpng_core::Rect;
    ///
    /// let canvas = Rect::from_size(4, 9).union_size(&Rect::from_size(7, 2));
    /// assert_eq!(canvas, Rect::from_size(7, 9));
    /// ```
    #[inline]
    pub fn union_size(&self, other: &Rect) -> Rect {
        Rect::from_size(self.width.max(other.width), self.height.max(other.height))
    }

    /// Iterates all (x, y) coordinates row by row.
    pub fn iter_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}
