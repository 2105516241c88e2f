//! Page-space geometry.
//!
//! All coordinates use a top-left origin: `x` grows to the right and `y`
//! grows downward, the way text extractors report glyph positions. Units
//! are PDF points (1/72 inch).

use serde::{Deserialize, Serialize};

/// Tolerance used for every coordinate comparison in the crate.
///
/// Extractors round glyph and ruling coordinates differently, so two values
/// closer than this are treated as the same position.
pub const EPSILON: f32 = 0.5;

/// Compare two coordinates with [`EPSILON`] tolerance.
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

/// A point on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: f32,
    /// Vertical position (distance from the top edge)
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    pub fn new(x0: f32, top: f32, x1: f32, bottom: f32) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// US Letter media box (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(0.0, 0.0, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// A4 media box (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(0.0, 0.0, 595.0, 842.0)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.top.is_finite() && self.x1.is_finite() && self.bottom.is_finite()
    }

    /// Check whether a point lies inside the rectangle, edges included.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x0 - EPSILON
            && point.x <= self.x1 + EPSILON
            && point.y >= self.top - EPSILON
            && point.y <= self.bottom + EPSILON
    }

    /// Check whether `other` lies fully inside this rectangle (all four edges).
    pub fn encloses(&self, other: &Rect) -> bool {
        other.x0 >= self.x0 - EPSILON
            && other.top >= self.top - EPSILON
            && other.x1 <= self.x1 + EPSILON
            && other.bottom <= self.bottom + EPSILON
    }

    /// Check whether two rectangles share any area or touch.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 + EPSILON
            && other.x0 <= self.x1 + EPSILON
            && self.top <= other.bottom + EPSILON
            && other.top <= self.bottom + EPSILON
    }

    /// Compute the union of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }
}
