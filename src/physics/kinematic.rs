//! Simple platformer engine
//!
//! Velocity-driven integrator: gravity is added to vertical velocity every
//! frame, then the body slides by its velocity. Units are pixels per frame.

use macroquad::math::vec2;

use super::collision::move_and_slide;
use super::spatial_hash::StaticGeometry;
use super::{Body, BodyHandle};

pub struct KinematicEngine {
    walls: StaticGeometry,
    gravity: f32,
    ground_probe: f32,
    /// Per-body gravity direction
    inverted: Vec<bool>,
}

impl KinematicEngine {
    pub fn new(walls: StaticGeometry, gravity: f32, ground_probe: f32) -> Self {
        Self {
            walls,
            gravity,
            ground_probe,
            inverted: Vec::new(),
        }
    }

    pub fn add_body(&mut self, gravity_inverted: bool) -> BodyHandle {
        self.inverted.push(gravity_inverted);
        BodyHandle(self.inverted.len() - 1)
    }

    /// Signed gravity for a body (positive pulls down)
    pub fn gravity_for(&self, handle: BodyHandle) -> f32 {
        if self.inverted.get(handle.0).copied().unwrap_or(false) {
            -self.gravity
        } else {
            self.gravity
        }
    }

    pub fn ground_probe(&self) -> f32 {
        self.ground_probe
    }

    /// Built-in grounded check: is there a wall just below the body?
    /// Only meaningful for downward gravity.
    pub fn can_jump(&self, body: &Body) -> bool {
        self.probe(body, -self.ground_probe)
    }

    /// Would the body overlap a wall if shifted vertically by `dy`?
    pub fn probe(&self, body: &Body, dy: f32) -> bool {
        self.walls.any_overlap(&body.aabb().translated(vec2(0.0, dy)))
    }

    /// Advance one body by one frame
    pub fn update(&self, handle: BodyHandle, body: &mut Body) {
        body.velocity.y -= self.gravity_for(handle);
        let delta = body.velocity;
        move_and_slide(&self.walls, body, delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Aabb;

    fn floor_and_ceiling() -> StaticGeometry {
        // Floor top at y=64, ceiling bottom at y=320
        let mut boxes = Vec::new();
        for i in 0..10 {
            let x = 32.0 + 64.0 * i as f32;
            boxes.push(Aabb::new(vec2(x, 32.0), vec2(64.0, 64.0)));
            boxes.push(Aabb::new(vec2(x, 352.0), vec2(64.0, 64.0)));
        }
        StaticGeometry::new(boxes, true, 64.0)
    }

    fn player_at(x: f32, y: f32) -> Body {
        Body::new(vec2(x, y), vec2(48.0, 96.0))
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let mut engine = KinematicEngine::new(floor_and_ceiling(), 1.0, 5.0);
        let handle = engine.add_body(false);
        let mut body = player_at(200.0, 200.0);

        for _ in 0..60 {
            engine.update(handle, &mut body);
        }
        assert_eq!(body.aabb().bottom(), 64.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(engine.can_jump(&body));
    }

    #[test]
    fn test_airborne_cannot_jump() {
        let mut engine = KinematicEngine::new(floor_and_ceiling(), 1.0, 5.0);
        engine.add_body(false);
        let body = player_at(200.0, 200.0);
        assert!(!engine.can_jump(&body));
    }

    #[test]
    fn test_inverted_body_rises_to_ceiling() {
        let mut engine = KinematicEngine::new(floor_and_ceiling(), 1.0, 5.0);
        let handle = engine.add_body(true);
        let mut body = player_at(200.0, 150.0);

        for _ in 0..60 {
            engine.update(handle, &mut body);
        }
        assert_eq!(body.aabb().top(), 320.0);
        // Built-in check only looks down
        assert!(!engine.can_jump(&body));
        assert!(engine.probe(&body, engine.ground_probe()));
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let wall = Aabb::new(vec2(300.0, 100.0), vec2(64.0, 200.0));
        let mut engine = KinematicEngine::new(StaticGeometry::new(vec![wall], false, 64.0), 0.0001, 5.0);
        let handle = engine.add_body(false);
        let mut body = player_at(200.0, 100.0);
        body.velocity = vec2(10.0, 0.0);

        for _ in 0..10 {
            engine.update(handle, &mut body);
        }
        assert_eq!(body.aabb().right(), wall.left());
        assert_eq!(body.velocity.x, 0.0);
    }
}
