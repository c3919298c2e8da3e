//! Player locomotion
//!
//! Turns held inputs into motion once per tick. The kinematic engine gets
//! direct velocity changes (accelerate, coast, jump speed); the rigid-body
//! engine gets forces, friction changes and a jump impulse. Both sit behind
//! `LocomotionAdapter` so the player code never matches on the engine.

use macroquad::math::vec2;

use super::player::{PressedInputs, Player};
use crate::physics::{Body, BodyHandle, Engine, PhysicsWorld};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// What the player wants this tick, resolved against the grounded query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionIntent {
    /// `None` when neither or both directions are held
    pub direction: Option<Facing>,
    pub jump: bool,
    pub grounded: bool,
    pub gravity_inverted: bool,
}

impl MotionIntent {
    pub fn from_inputs(pressed: &PressedInputs, grounded: bool, gravity_inverted: bool) -> Self {
        let direction = match (pressed.left, pressed.right) {
            (false, true) => Some(Facing::Right),
            (true, false) => Some(Facing::Left),
            _ => None,
        };
        Self {
            direction,
            jump: pressed.jump,
            grounded,
            gravity_inverted,
        }
    }

    /// Jump held while grounded. Re-triggers every tick the key stays down.
    pub fn wants_jump(&self) -> bool {
        self.jump && self.grounded
    }
}

pub trait LocomotionAdapter {
    /// Is the body standing on something, "down" following its gravity?
    fn is_grounded(&self, handle: BodyHandle, body: &Body, gravity_inverted: bool) -> bool;

    /// Apply one tick of intent to the body
    fn drive(&mut self, handle: BodyHandle, body: &mut Body, intent: &MotionIntent);
}

/// Speed up toward the cap in `direction`, stopping exactly at it.
/// No increment once `|vx|` has reached the cap, whichever way it points.
pub fn accelerate(vx: f32, direction: Facing, acceleration: f32, max_speed: f32) -> f32 {
    if vx.abs() >= max_speed {
        return vx;
    }
    match direction {
        Facing::Right => (vx + acceleration).min(max_speed),
        Facing::Left => (vx - acceleration).max(-max_speed),
    }
}

/// Slow down by `acceleration`, snapping to zero once within one step of it
pub fn coast(vx: f32, acceleration: f32) -> f32 {
    if vx.abs() <= acceleration {
        0.0
    } else {
        vx - vx.signum() * acceleration
    }
}

pub fn jump_velocity(jump_speed: f32, gravity_inverted: bool) -> f32 {
    if gravity_inverted {
        -jump_speed
    } else {
        jump_speed
    }
}

/// Run locomotion for one player. Returns true if the player jumped.
pub fn update_player(player: &mut Player, adapter: &mut dyn LocomotionAdapter) -> bool {
    let handle = player.handle();
    let inverted = player.gravity_inverted();
    let grounded = adapter.is_grounded(handle, &player.body, inverted);
    let intent = MotionIntent::from_inputs(&player.pressed, grounded, inverted);
    if let Some(facing) = intent.direction {
        player.facing = facing;
    }
    adapter.drive(handle, &mut player.body, &intent);
    intent.wants_jump()
}

impl LocomotionAdapter for PhysicsWorld {
    fn is_grounded(&self, handle: BodyHandle, body: &Body, gravity_inverted: bool) -> bool {
        match self.engine() {
            Engine::Kinematic(engine) => {
                if gravity_inverted {
                    // Built-in check only looks down
                    engine.probe(body, engine.ground_probe())
                } else {
                    engine.can_jump(body)
                }
            }
            Engine::RigidBody(engine) => engine.is_on_ground(handle, body),
        }
    }

    fn drive(&mut self, handle: BodyHandle, body: &mut Body, intent: &MotionIntent) {
        let config = self.config().clone();
        match self.engine_mut() {
            Engine::Kinematic(_) => {
                let k = &config.kinematic;
                body.velocity.x = match intent.direction {
                    Some(facing) => accelerate(body.velocity.x, facing, k.acceleration, k.max_speed),
                    None => coast(body.velocity.x, k.acceleration),
                };
                if intent.wants_jump() {
                    body.velocity.y = jump_velocity(k.jump_speed, intent.gravity_inverted);
                }
            }
            Engine::RigidBody(engine) => {
                let r = &config.rigid_body;
                match intent.direction {
                    Some(facing) => {
                        let force = if intent.grounded {
                            r.move_force_on_ground
                        } else {
                            r.move_force_in_air
                        };
                        engine.apply_force(handle, vec2(facing.sign() * force, 0.0));
                        engine.set_friction(handle, 0.0);
                    }
                    None => engine.set_friction(handle, r.player_friction),
                }
                if intent.wants_jump() {
                    let impulse = jump_velocity(r.jump_impulse, intent.gravity_inverted);
                    engine.apply_impulse(handle, body, vec2(0.0, impulse));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::input::ControlSet;
    use crate::physics::{Aabb, PhysicsMode, StaticGeometry};
    use macroquad::math::{vec2, Vec2};

    const ACCEL: f32 = 0.9;
    const MAX: f32 = 10.0;

    /// Adapter with a fixed grounded answer that records intents
    struct Scripted {
        grounded: bool,
        intents: Vec<MotionIntent>,
    }

    impl LocomotionAdapter for Scripted {
        fn is_grounded(&self, _: BodyHandle, _: &Body, _: bool) -> bool {
            self.grounded
        }

        fn drive(&mut self, _: BodyHandle, body: &mut Body, intent: &MotionIntent) {
            if intent.wants_jump() {
                body.velocity.y = jump_velocity(20.0, intent.gravity_inverted);
            }
            self.intents.push(*intent);
        }
    }

    fn player() -> Player {
        Player::new(ControlSet::arrows(), vec2(100.0, 64.0), vec2(48.0, 96.0), BodyHandle(0))
    }

    #[test]
    fn test_accelerate_stops_at_cap() {
        let mut vx = 0.0;
        for _ in 0..100 {
            let next = accelerate(vx, Facing::Right, ACCEL, MAX);
            assert!(next <= MAX);
            if vx + ACCEL < MAX {
                assert_eq!(next, vx + ACCEL);
            }
            vx = next;
        }
        assert_eq!(vx, MAX);
        assert_eq!(accelerate(MAX, Facing::Right, ACCEL, MAX), MAX);
    }

    #[test]
    fn test_accelerate_left_is_symmetric() {
        assert_eq!(accelerate(0.0, Facing::Left, ACCEL, MAX), -ACCEL);
        assert_eq!(accelerate(-9.5, Facing::Left, ACCEL, MAX), -MAX);
    }

    #[test]
    fn test_no_increment_at_cap_in_either_direction() {
        assert_eq!(accelerate(-MAX, Facing::Right, ACCEL, MAX), -MAX);
        assert_eq!(accelerate(MAX, Facing::Left, ACCEL, MAX), MAX);
        assert_eq!(accelerate(-MAX, Facing::Left, ACCEL, MAX), -MAX);
        // Just under the cap the reverse push applies
        assert_eq!(accelerate(-9.0, Facing::Right, ACCEL, MAX), -9.0 + ACCEL);
    }

    #[test]
    fn test_coast_snaps_to_zero() {
        for vx in [0.0, 0.5, -0.5, ACCEL, -ACCEL] {
            assert_eq!(coast(vx, ACCEL), 0.0);
        }
        assert_eq!(coast(5.0, ACCEL), 5.0 - ACCEL);
        assert_eq!(coast(-5.0, ACCEL), -5.0 + ACCEL);
    }

    #[test]
    fn test_coast_never_flips_sign() {
        let mut vx = 7.3;
        while vx != 0.0 {
            vx = coast(vx, ACCEL);
            assert!(vx >= 0.0);
        }
    }

    #[test]
    fn test_direction_from_inputs() {
        let mut pressed = PressedInputs::default();
        assert_eq!(MotionIntent::from_inputs(&pressed, true, false).direction, None);
        pressed.right = true;
        assert_eq!(MotionIntent::from_inputs(&pressed, true, false).direction, Some(Facing::Right));
        pressed.left = true;
        assert_eq!(MotionIntent::from_inputs(&pressed, true, false).direction, None);
        pressed.right = false;
        assert_eq!(MotionIntent::from_inputs(&pressed, true, false).direction, Some(Facing::Left));
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut airborne = Scripted { grounded: false, intents: Vec::new() };
        let mut p = player();
        p.pressed.jump = true;
        p.body.velocity.y = -3.0;
        assert!(!update_player(&mut p, &mut airborne));
        assert_eq!(p.body.velocity.y, -3.0);

        let mut grounded = Scripted { grounded: true, intents: Vec::new() };
        assert!(update_player(&mut p, &mut grounded));
        assert_eq!(p.body.velocity.y, 20.0);
        // Still held and grounded: jumps again
        assert!(update_player(&mut p, &mut grounded));
    }

    #[test]
    fn test_facing_follows_direction() {
        let mut adapter = Scripted { grounded: true, intents: Vec::new() };
        let mut p = player();
        p.pressed.left = true;
        update_player(&mut p, &mut adapter);
        assert_eq!(p.facing, Facing::Left);

        p.pressed.left = false;
        update_player(&mut p, &mut adapter);
        assert_eq!(p.facing, Facing::Left);
        assert_eq!(adapter.intents[1].direction, None);
    }

    fn floor() -> StaticGeometry {
        StaticGeometry::new(vec![Aabb::new(vec2(0.0, -32.0), vec2(4000.0, 64.0))], true, 64.0)
    }

    #[test]
    fn test_kinematic_world_adapter() {
        let mut world = PhysicsWorld::new(&PhysicsConfig::default(), floor());
        let handle = world.add_body();
        let mut body = Body::new(vec2(0.0, 48.0), vec2(48.0, 96.0));
        assert!(world.is_grounded(handle, &body, false));
        assert!(!world.is_grounded(handle, &body, true));

        let intent = MotionIntent {
            direction: Some(Facing::Right),
            jump: true,
            grounded: true,
            gravity_inverted: false,
        };
        world.drive(handle, &mut body, &intent);
        assert_eq!(body.velocity, vec2(0.9, 20.0));

        let inverted = MotionIntent { gravity_inverted: true, ..intent };
        world.drive(handle, &mut body, &inverted);
        assert_eq!(body.velocity.y, -20.0);
    }

    #[test]
    fn test_rigid_body_world_adapter() {
        let config = PhysicsConfig {
            mode: PhysicsMode::RigidBody,
            ..PhysicsConfig::default()
        };
        let mut world = PhysicsWorld::new(&config, floor());
        let handle = world.add_body();
        let mut body = Body::new(vec2(0.0, 48.0), vec2(48.0, 96.0));
        assert!(world.is_grounded(handle, &body, false));

        let push = MotionIntent {
            direction: Some(Facing::Right),
            grounded: true,
            ..MotionIntent::default()
        };
        world.drive(handle, &mut body, &push);
        let friction = |world: &PhysicsWorld| match world.engine() {
            Engine::RigidBody(engine) => engine.friction(handle),
            Engine::Kinematic(_) => None,
        };
        assert_eq!(friction(&world), Some(0.0));
        world.step(handle, &mut body);
        assert!(body.velocity.x > 0.0);

        world.drive(handle, &mut body, &MotionIntent { grounded: true, ..MotionIntent::default() });
        assert_eq!(friction(&world), Some(config.rigid_body.player_friction));

        let jump = MotionIntent { jump: true, grounded: true, ..MotionIntent::default() };
        let before = body.velocity.y;
        world.drive(handle, &mut body, &jump);
        assert_eq!(body.velocity.y - before, 900.0);
        assert_ne!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_rigid_body_air_force_is_smaller() {
        let config = PhysicsConfig {
            mode: PhysicsMode::RigidBody,
            ..PhysicsConfig::default()
        };
        let r = &config.rigid_body;

        let push = |start: Vec2, grounded: bool| {
            let mut world = PhysicsWorld::new(&config, floor());
            let handle = world.add_body();
            let mut body = Body::new(start, vec2(48.0, 96.0));
            assert_eq!(world.is_grounded(handle, &body, false), grounded);
            let intent = MotionIntent {
                direction: Some(Facing::Right),
                grounded,
                ..MotionIntent::default()
            };
            world.drive(handle, &mut body, &intent);
            world.step(handle, &mut body);
            body.velocity.x
        };

        let on_ground = push(vec2(0.0, 48.0), true);
        let in_air = push(vec2(0.0, 400.0), false);
        assert!(in_air > 0.0);
        assert!(in_air < on_ground);
        let expected = r.move_force_in_air / r.move_force_on_ground;
        assert!((in_air / on_ground - expected).abs() < 1e-4);
    }
}
