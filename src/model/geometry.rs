//! Page-space and pixel-space geometry.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates (points, 1/72 inch).
///
/// The origin is the top-left corner of the page and `y` grows downward,
/// so a well-formed rectangle has `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl PageRect {
    /// Create a rectangle from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle covering a whole page of the given size.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Whether the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Swap edges so that `left <= right` and `top <= bottom`.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.left.min(self.right),
            self.top.min(self.bottom),
            self.left.max(self.right),
            self.top.max(self.bottom),
        )
    }

    /// Intersection with another rectangle, `None` when they do not overlap.
    pub fn intersect(&self, other: &PageRect) -> Option<PageRect> {
        let rect = PageRect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        if rect.is_empty() {
            None
        } else {
            Some(rect)
        }
    }
}

/// Bounding box of the changed pixels between two renders.
///
/// All bounds are inclusive pixel indices in the coordinate space of the
/// compared bitmaps (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRegion {
    /// Leftmost changed column
    pub x_min: u32,
    /// Topmost changed row
    pub y_min: u32,
    /// Rightmost changed column
    pub x_max: u32,
    /// Bottommost changed row
    pub y_max: u32,
}

impl DiffRegion {
    /// Create a region from inclusive bounds.
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Region covering a single pixel.
    pub fn point(x: u32, y: u32) -> Self {
        Self::new(x, y, x, y)
    }

    /// Grow the region so it also covers `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        self.x_min = self.x_min.min(x);
        self.y_min = self.y_min.min(y);
        self.x_max = self.x_max.max(x);
        self.y_max = self.y_max.max(y);
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.y_max - self.y_min + 1
    }

    /// Whether the pixel lies inside the region.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }
}

/// Horizontal extent of text content on a page, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextRange {
    /// Leftmost text edge
    pub left: f32,
    /// Rightmost text edge
    pub right: f32,
}

impl TextRange {
    /// Create a range from its edges.
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Union of two ranges, so a clip never cuts off content unique to
    /// either side.
    pub fn merge(&self, other: &TextRange) -> TextRange {
        TextRange::new(self.left.min(other.left), self.right.max(other.right))
    }

    /// Full-height clip rectangle spanning this range.
    pub fn to_clip(&self, page_height: f32) -> PageRect {
        PageRect::new(self.left, 0.0, self.right, page_height)
    }
}
