//! Collision response against static geometry
//!
//! Bodies move one axis at a time. After each axis move, any wall the body
//! now overlaps pushes it back to the wall's face and zeroes the velocity on
//! that axis. Walls never move, so a single pass per axis is enough.

use macroquad::math::Vec2;

use super::spatial_hash::StaticGeometry;
use super::Body;

/// Move `body` by `delta`, sliding along whatever it hits
pub fn move_and_slide(walls: &StaticGeometry, body: &mut Body, delta: Vec2) {
    body.position.x += delta.x;
    for wall in walls.overlapping(&body.aabb()) {
        let half = body.size.x * 0.5;
        if delta.x > 0.0 {
            body.position.x = body.position.x.min(wall.left() - half);
        } else if delta.x < 0.0 {
            body.position.x = body.position.x.max(wall.right() + half);
        }
        body.velocity.x = 0.0;
    }

    body.position.y += delta.y;
    for wall in walls.overlapping(&body.aabb()) {
        let half = body.size.y * 0.5;
        if delta.y > 0.0 {
            body.position.y = body.position.y.min(wall.bottom() - half);
        } else if delta.y < 0.0 {
            body.position.y = body.position.y.max(wall.top() + half);
        }
        body.velocity.y = 0.0;
    }
}
