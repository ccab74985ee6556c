//! Math utilities and types
//!
//! Provides the 2D math types used by colliders and the spatial index.

pub use nalgebra::{Point2, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Position in world units
pub type WorldPosition = Point2<f32>;

/// Axis-aligned bounding box described by its lower-left and upper-right corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lower-left corner (smallest x and y)
    pub min: WorldPosition,
    /// Upper-right corner (largest x and y)
    pub max: WorldPosition,
}

impl Aabb {
    /// Create a box from explicit corners
    pub fn new(min: WorldPosition, max: WorldPosition) -> Self {
        Self { min, max }
    }

    /// Create a box from its center and full extents
    pub fn from_center(center: WorldPosition, width: f32, height: f32) -> Self {
        let half = Vec2::new(width / 2.0, height / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: WorldPosition::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: WorldPosition::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Left edge x
    pub fn left(&self) -> f32 {
        self.min.x
    }

    /// Right edge x
    pub fn right(&self) -> f32 {
        self.max.x
    }

    /// Bottom edge y
    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    /// Top edge y
    pub fn top(&self) -> f32 {
        self.max.y
    }

    /// Inclusive intersection: boxes sharing only an edge or a corner count
    pub fn touches(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Strict intersection: the interiors must overlap
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Area shared by both boxes, zero when they only touch or are apart
    pub fn overlap_area(&self, other: &Self) -> f32 {
        let width = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let height = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        width.max(0.0) * height.max(0.0)
    }
}
