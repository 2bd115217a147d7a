//! Math utilities and types
//!
//! Provides the 2D vector alias used throughout the engine and the
//! axis-aligned [`Rect`] that every collider is measured against.

pub use nalgebra::Vector2;

use serde::{Deserialize, Serialize};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Distance between two points
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).magnitude()
}

/// Axis-aligned rectangle stored as its min corner plus extents.
///
/// Y grows downward, so `y` is the top edge and `y + height` the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its min corner and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create the smallest rectangle spanning two corners
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Min corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Max corner
    pub fn max_position(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Copy of this rectangle shifted by a delta
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shift this rectangle in place
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Open-interval overlap test; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Intersection of two rectangles, or an empty rectangle when they don't overlap
    pub fn overlap_rect(&self, other: &Rect) -> Rect {
        if !self.overlaps(other) {
            return Rect::default();
        }

        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Rect::new(left, top, right - left, bottom - top)
    }

    /// Whether a point lies inside the half-open rectangle `[min, max)`
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }

    /// Smallest rectangle containing both
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let min = Vec2::new(self.x.min(other.x), self.y.min(other.y));
        let max = Vec2::new(self.right().max(other.right()), self.bottom().max(other.bottom()));
        Rect::from_corners(min, max)
    }
}
