//! Follow camera
//!
//! Tracks player one. `position` is the bottom-left corner of the view in
//! world coordinates; it never leaves the map unless the map is smaller
//! than the viewport, in which case it stays pinned at the origin.

use macroquad::camera::Camera2D;
use macroquad::math::{vec2, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    position: Vec2,
    viewport: Vec2,
}

impl FollowCamera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Camera position that centers `focus`, clamped to the map
    pub fn target_for(&self, focus: Vec2, map_size: Vec2) -> Vec2 {
        let max = (map_size - self.viewport).max(Vec2::ZERO);
        (focus - self.viewport * 0.5).clamp(Vec2::ZERO, max)
    }

    /// Move a `smoothing` fraction of the way toward `target`
    pub fn move_to(&mut self, target: Vec2, smoothing: f32) {
        self.position += (target - self.position) * smoothing;
    }

    pub fn snap_to(&mut self, target: Vec2) {
        self.position = target;
    }

    /// World-space camera for drawing (y up)
    pub fn to_camera2d(&self) -> Camera2D {
        Camera2D {
            target: self.position + self.viewport * 0.5,
            zoom: vec2(2.0 / self.viewport.x, 2.0 / self.viewport.y),
            ..Default::default()
        }
    }
}
