//! Collision detection for axis-aligned hitboxes
//!
//! Both boxes are shrunk by a fixed margin before the overlap test so a near
//! miss (a pixel of cat tail grazing Granny's hair) does not end the run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in field coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box with top-left corner `pos` and extent `size`
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Shrink by `margin` on all four sides
    ///
    /// A margin larger than half the box leaves an inverted (empty) box.
    #[inline]
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(margin),
            max: self.max - Vec2::splat(margin),
        }
    }

    /// True if the box has no area
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Strict overlap on both axes; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Check whether two hitboxes collide once each is inset by `margin`
pub fn hitboxes_collide(a: &Aabb, b: &Aabb, margin: f32) -> bool {
    a.inset(margin).overlaps(&b.inset(margin))
}
