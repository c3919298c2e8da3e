//! Axis-aligned boxes
//!
//! Every collidable thing in a level (tiles, coins, the player) is an
//! axis-aligned rectangle stored as center + half extents. World space is
//! y-up, in pixels.

use macroquad::math::{vec2, Vec2};

/// Boxes closer than this are treated as touching, not overlapping.
/// Keeps a body that was just snapped onto a surface from re-colliding
/// with it because of float rounding.
pub const CONTACT_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    /// Build from center and full size
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            center: self.center + offset,
            half: self.half,
        }
    }

    /// Strict overlap. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let gap = (self.center - other.center).abs();
        let reach = self.half + other.half;
        gap.x < reach.x - CONTACT_EPSILON && gap.y < reach.y - CONTACT_EPSILON
    }

    /// Bottom-left corner, handy for rect drawing
    pub fn min(&self) -> Vec2 {
        vec2(self.left(), self.bottom())
    }
}
