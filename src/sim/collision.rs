//! Axis-aligned bounding boxes
//!
//! Every overlap in the runner (character vs obstacle, coin, pickup) is a
//! discrete per-tick box test. Edges that merely touch do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Box spanning `min` (top-left) to `max` (bottom-right) in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from a top-left corner and a size
    #[inline]
    pub fn from_rect(top_left: Vec2, size: Vec2) -> Self {
        Self {
            min: top_left,
            max: top_left + size,
        }
    }

    /// Box extending `half_extent` in every direction from `center`
    #[inline]
    pub fn centered(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Shrink every side by `margin`
    #[inline]
    pub fn inset(&self, margin: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(margin),
            max: self.max - Vec2::splat(margin),
        }
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}
