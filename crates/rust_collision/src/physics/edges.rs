//! Leading-edge intersection primitives
//!
//! A moving box can only start touching something with the faces that point in
//! its direction of travel. For one movement step each such face is treated as
//! a segment swept from its position before the step to its position after it,
//! and tested against candidate boxes.
//!
//! ```text
//!   moving right, one step         candidate
//!      +----+ -> +----+            +--------+
//!      |    |    |    |   ... ->   |        |
//!      +----+    +----+            +--------+
//!           [swept x]  <- vertical leading edge, y span = mover height
//! ```

use crate::foundation::math::{Aabb, WorldPosition};

/// How much contact counts as a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Inclusive bounds: sharing an edge or a corner counts
    Touch,
    /// Strict bounds: the edge has to reach the candidate's interior
    Penetrate,
}

impl Contact {
    #[inline]
    fn intervals_meet(self, a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
        match self {
            Self::Touch => a_min <= b_max && a_max >= b_min,
            Self::Penetrate => a_min < b_max && a_max > b_min,
        }
    }
}

/// Face with a fixed x (left or right side of a box), swept along x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalEdge {
    /// Smallest x covered by the sweep
    pub x_min: f32,
    /// Largest x covered by the sweep
    pub x_max: f32,
    /// Bottom of the face
    pub y_min: f32,
    /// Top of the face
    pub y_max: f32,
}

/// Face with a fixed y (top or bottom side of a box), swept along y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalEdge {
    /// Smallest y covered by the sweep
    pub y_min: f32,
    /// Largest y covered by the sweep
    pub y_max: f32,
    /// Left end of the face
    pub x_min: f32,
    /// Right end of the face
    pub x_max: f32,
}

impl VerticalEdge {
    /// Stationary face at `x` spanning `y_min..=y_max`
    pub fn at(x: f32, y_min: f32, y_max: f32) -> Self {
        Self { x_min: x, x_max: x, y_min, y_max }
    }

    /// Region covered by the sweep, used for cell lookups
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            WorldPosition::new(self.x_min, self.y_min),
            WorldPosition::new(self.x_max, self.y_max),
        )
    }
}

impl HorizontalEdge {
    /// Stationary face at `y` spanning `x_min..=x_max`
    pub fn at(y: f32, x_min: f32, x_max: f32) -> Self {
        Self { y_min: y, y_max: y, x_min, x_max }
    }

    /// Region covered by the sweep, used for cell lookups
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            WorldPosition::new(self.x_min, self.y_min),
            WorldPosition::new(self.x_max, self.y_max),
        )
    }
}

/// Test a vertical edge against a candidate box
///
/// Hit iff the swept x range meets `[left, right]` and the face's y span meets
/// `[bottom, top]`.
pub fn vertical_edge_intersects(edge: &VerticalEdge, target: &Aabb, contact: Contact) -> bool {
    contact.intervals_meet(edge.x_min, edge.x_max, target.left(), target.right())
        && contact.intervals_meet(edge.y_min, edge.y_max, target.bottom(), target.top())
}

/// Test a horizontal edge against a candidate box
///
/// Hit iff the swept y range meets `[bottom, top]` and the face's x span meets
/// `[left, right]`.
pub fn horizontal_edge_intersects(edge: &HorizontalEdge, target: &Aabb, contact: Contact) -> bool {
    contact.intervals_meet(edge.y_min, edge.y_max, target.bottom(), target.top())
        && contact.intervals_meet(edge.x_min, edge.x_max, target.left(), target.right())
}

/// The one or two faces leading a single movement step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LeadingEdges {
    /// Left or right face, present when the step changes x
    pub vertical: Option<VerticalEdge>,
    /// Bottom or top face, present when the step changes y
    pub horizontal: Option<HorizontalEdge>,
}

impl LeadingEdges {
    /// Faces of `width` x `height` box moving from `from` to `to`
    ///
    /// A zero-length step has no leading faces.
    pub fn for_step(from: WorldPosition, to: WorldPosition, width: f32, height: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        let vertical = (dx != 0.0).then(|| {
            let side = if dx > 0.0 { half_w } else { -half_w };
            VerticalEdge {
                x_min: from.x.min(to.x) + side,
                x_max: from.x.max(to.x) + side,
                y_min: from.y.min(to.y) - half_h,
                y_max: from.y.max(to.y) + half_h,
            }
        });

        let horizontal = (dy != 0.0).then(|| {
            let side = if dy > 0.0 { half_h } else { -half_h };
            HorizontalEdge {
                y_min: from.y.min(to.y) + side,
                y_max: from.y.max(to.y) + side,
                x_min: from.x.min(to.x) - half_w,
                x_max: from.x.max(to.x) + half_w,
            }
        });

        Self { vertical, horizontal }
    }

    /// Check whether any face hits `target`
    pub fn intersects(&self, target: &Aabb, contact: Contact) -> bool {
        self.vertical
            .is_some_and(|edge| vertical_edge_intersects(&edge, target, contact))
            || self
                .horizontal
                .is_some_and(|edge| horizontal_edge_intersects(&edge, target, contact))
    }

    /// Regions to look up in the spatial index
    pub fn bounds(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.vertical
            .iter()
            .map(VerticalEdge::bounds)
            .chain(self.horizontal.iter().map(HorizontalEdge::bounds))
    }

    /// Check whether the step has no leading face
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}
