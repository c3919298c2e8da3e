//! Force/impulse engine
//!
//! A small rigid-body integrator for the player: forces accumulate between
//! steps, impulses change velocity immediately, damping and per-body speed
//! caps apply every step, and Coulomb friction against the ground slows a
//! body that is standing on something. Walls are static boxes. Units are
//! pixels and seconds.

use macroquad::math::{vec2, Vec2};

use super::collision::move_and_slide;
use super::spatial_hash::StaticGeometry;
use super::{Body, BodyHandle};

/// Registration parameters for one body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBodyParams {
    pub mass: f32,
    pub friction: f32,
    /// Fraction of velocity kept per second
    pub damping: f32,
    pub max_horizontal_speed: f32,
    pub max_vertical_speed: f32,
}

#[derive(Debug, Clone, Copy)]
struct RigidBodyState {
    params: RigidBodyParams,
    /// Current friction (locomotion zeroes it while driving)
    friction: f32,
    /// Accumulated force, cleared every step
    force: Vec2,
    gravity_inverted: bool,
}

pub struct RigidBodyEngine {
    walls: StaticGeometry,
    gravity: f32,
    wall_friction: f32,
    step_seconds: f32,
    ground_probe: f32,
    bodies: Vec<RigidBodyState>,
}

impl RigidBodyEngine {
    pub fn new(
        walls: StaticGeometry,
        gravity: f32,
        wall_friction: f32,
        step_seconds: f32,
        ground_probe: f32,
    ) -> Self {
        Self {
            walls,
            gravity,
            wall_friction,
            step_seconds,
            ground_probe,
            bodies: Vec::new(),
        }
    }

    pub fn add_body(&mut self, params: RigidBodyParams, gravity_inverted: bool) -> BodyHandle {
        self.bodies.push(RigidBodyState {
            params,
            friction: params.friction,
            force: Vec2::ZERO,
            gravity_inverted,
        });
        BodyHandle(self.bodies.len() - 1)
    }

    /// Gravity acceleration acting on a body
    pub fn gravity_vector(&self, handle: BodyHandle) -> Vec2 {
        match self.bodies.get(handle.0) {
            Some(state) if state.gravity_inverted => vec2(0.0, self.gravity),
            _ => vec2(0.0, -self.gravity),
        }
    }

    /// Add a force for the next step
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec2) {
        if let Some(state) = self.bodies.get_mut(handle.0) {
            state.force += force;
        }
    }

    /// Change velocity immediately by `impulse / mass`
    pub fn apply_impulse(&mut self, handle: BodyHandle, body: &mut Body, impulse: Vec2) {
        if let Some(state) = self.bodies.get(handle.0) {
            body.velocity += impulse / state.params.mass;
        }
    }

    pub fn set_friction(&mut self, handle: BodyHandle, friction: f32) {
        if let Some(state) = self.bodies.get_mut(handle.0) {
            state.friction = friction;
        }
    }

    pub fn friction(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(handle.0).map(|s| s.friction)
    }

    /// Is the body resting on a wall, "down" being the way gravity pulls it?
    pub fn is_on_ground(&self, handle: BodyHandle, body: &Body) -> bool {
        let down = self.gravity_vector(handle).normalize_or_zero();
        self.walls.any_overlap(&body.aabb().translated(down * self.ground_probe))
    }

    /// Advance one body by one fixed step
    pub fn step(&mut self, handle: BodyHandle, body: &mut Body) {
        let dt = self.step_seconds;
        let grounded = self.is_on_ground(handle, body);
        let gravity = self.gravity_vector(handle);
        let Some(state) = self.bodies.get_mut(handle.0) else {
            return;
        };

        let accel = state.force / state.params.mass + gravity;
        state.force = Vec2::ZERO;
        body.velocity += accel * dt;
        body.velocity *= state.params.damping.powf(dt);

        if grounded {
            let mu = state.friction * self.wall_friction;
            body.velocity.x = approach_zero(body.velocity.x, mu * self.gravity * dt);
        }

        let max_h = state.params.max_horizontal_speed;
        let max_v = state.params.max_vertical_speed;
        body.velocity.x = body.velocity.x.clamp(-max_h, max_h);
        body.velocity.y = body.velocity.y.clamp(-max_v, max_v);

        let delta = body.velocity * dt;
        move_and_slide(&self.walls, body, delta);
    }
}

/// Reduce |v| by `amount` without crossing zero
fn approach_zero(v: f32, amount: f32) -> f32 {
    if v.abs() <= amount {
        0.0
    } else {
        v - v.signum() * amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Aabb;

    const DT: f32 = 1.0 / 60.0;

    fn params() -> RigidBodyParams {
        RigidBodyParams {
            mass: 2.0,
            friction: 1.0,
            damping: 1.0,
            max_horizontal_speed: 650.0,
            max_vertical_speed: 1600.0,
        }
    }

    /// Floor top at y=0, ceiling bottom at y=400
    fn engine() -> RigidBodyEngine {
        let walls = vec![
            Aabb::new(vec2(0.0, -32.0), vec2(4000.0, 64.0)),
            Aabb::new(vec2(0.0, 432.0), vec2(4000.0, 64.0)),
        ];
        RigidBodyEngine::new(StaticGeometry::new(walls, false, 64.0), 2600.0, 0.7, DT, 1.0)
    }

    fn standing() -> Body {
        Body::new(vec2(0.0, 48.0), vec2(48.0, 96.0))
    }

    #[test]
    fn test_resting_body_stays_grounded() {
        let mut engine = engine();
        let handle = engine.add_body(params(), false);
        let mut body = standing();

        for _ in 0..30 {
            engine.step(handle, &mut body);
        }
        assert!(engine.is_on_ground(handle, &body));
        assert_eq!(body.aabb().bottom(), 0.0);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_force_without_friction_accelerates() {
        let mut engine = engine();
        let handle = engine.add_body(params(), false);
        let mut body = standing();

        engine.set_friction(handle, 0.0);
        engine.apply_force(handle, vec2(8000.0, 0.0));
        engine.step(handle, &mut body);
        assert!((body.velocity.x - 4000.0 * DT).abs() < 1e-3);

        // Force is one-shot per step
        engine.step(handle, &mut body);
        assert!((body.velocity.x - 4000.0 * DT).abs() < 1e-3);
    }

    #[test]
    fn test_friction_stops_without_reversing() {
        let mut engine = engine();
        let handle = engine.add_body(params(), false);
        let mut body = standing();
        body.velocity.x = 100.0;

        let mut last = body.velocity.x;
        for _ in 0..120 {
            engine.step(handle, &mut body);
            assert!(body.velocity.x >= 0.0);
            assert!(body.velocity.x <= last);
            last = body.velocity.x;
        }
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_horizontal_speed_cap() {
        let mut engine = engine();
        let handle = engine.add_body(params(), false);
        let mut body = standing();
        engine.set_friction(handle, 0.0);

        for _ in 0..120 {
            engine.apply_force(handle, vec2(8000.0, 0.0));
            engine.step(handle, &mut body);
        }
        assert_eq!(body.velocity.x, 650.0);
    }

    #[test]
    fn test_impulse_launches_body() {
        let mut engine = engine();
        let handle = engine.add_body(params(), false);
        let mut body = standing();

        engine.apply_impulse(handle, &mut body, vec2(0.0, 1800.0));
        assert_eq!(body.velocity.y, 900.0);
        engine.step(handle, &mut body);
        assert!(body.aabb().bottom() > 0.0);
        assert!(!engine.is_on_ground(handle, &body));
    }

    #[test]
    fn test_inverted_body_grounds_on_ceiling() {
        let mut engine = engine();
        let handle = engine.add_body(params(), true);
        let mut body = Body::new(vec2(0.0, 300.0), vec2(48.0, 96.0));

        for _ in 0..60 {
            engine.step(handle, &mut body);
        }
        assert_eq!(body.aabb().top(), 400.0);
        assert!(engine.is_on_ground(handle, &body));
    }

    #[test]
    fn test_approach_zero() {
        assert_eq!(approach_zero(5.0, 2.0), 3.0);
        assert_eq!(approach_zero(-5.0, 2.0), -3.0);
        assert_eq!(approach_zero(1.5, 2.0), 0.0);
        assert_eq!(approach_zero(-1.5, 2.0), 0.0);
    }
}
