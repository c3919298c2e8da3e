//! Physics
//!
//! Two interchangeable engines behind one `PhysicsWorld`:
//! - Kinematic: per-frame velocity integration with a built-in downward
//!   "can jump" probe (the simple platformer engine)
//! - RigidBody: forces, impulses, friction and damping per body
//!
//! Both collide bodies against the same static wall geometry (platforms
//! and boxes). Flipping a body's gravity rebuilds the whole world, the
//! same way it is done at level setup.

pub mod aabb;
pub mod collision;
pub mod kinematic;
pub mod rigid_body;
pub mod spatial_hash;

pub use aabb::Aabb;
pub use kinematic::KinematicEngine;
pub use rigid_body::{RigidBodyEngine, RigidBodyParams};
pub use spatial_hash::{SpatialHash, StaticGeometry};

use macroquad::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PhysicsConfig;

/// Which engine drives the players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhysicsMode {
    #[default]
    Kinematic,
    RigidBody,
}

/// Index of a body registered with the physics world.
/// Stable across rebuilds: bodies are re-registered in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub usize);

/// A moving box (the player). Position is the box center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }
}

pub enum Engine {
    Kinematic(KinematicEngine),
    RigidBody(RigidBodyEngine),
}

pub struct PhysicsWorld {
    engine: Engine,
    config: PhysicsConfig,
    walls: StaticGeometry,
    /// Gravity direction per registered body, in handle order
    inverted: Vec<bool>,
    rebuilds: u32,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig, walls: StaticGeometry) -> Self {
        let engine = Self::build_engine(config, walls.clone(), &[]);
        Self {
            engine,
            config: config.clone(),
            walls,
            inverted: Vec::new(),
            rebuilds: 0,
        }
    }

    fn build_engine(config: &PhysicsConfig, walls: StaticGeometry, inverted: &[bool]) -> Engine {
        match config.mode {
            PhysicsMode::Kinematic => {
                let k = &config.kinematic;
                let mut engine = KinematicEngine::new(walls, k.gravity, k.ground_probe);
                for &flag in inverted {
                    engine.add_body(flag);
                }
                Engine::Kinematic(engine)
            }
            PhysicsMode::RigidBody => {
                let r = &config.rigid_body;
                let mut engine = RigidBodyEngine::new(
                    walls,
                    r.gravity,
                    r.wall_friction,
                    r.step_seconds,
                    r.ground_probe,
                );
                for &flag in inverted {
                    engine.add_body(Self::player_params(config), flag);
                }
                Engine::RigidBody(engine)
            }
        }
    }

    fn player_params(config: &PhysicsConfig) -> RigidBodyParams {
        let r = &config.rigid_body;
        RigidBodyParams {
            mass: r.player_mass,
            friction: r.player_friction,
            damping: r.player_damping * r.default_damping,
            max_horizontal_speed: r.max_horizontal_speed,
            max_vertical_speed: r.max_vertical_speed,
        }
    }

    /// Register a player body with normal gravity
    pub fn add_body(&mut self) -> BodyHandle {
        self.inverted.push(false);
        let handle = match &mut self.engine {
            Engine::Kinematic(engine) => engine.add_body(false),
            Engine::RigidBody(engine) => engine.add_body(Self::player_params(&self.config), false),
        };
        debug_assert_eq!(handle.0, self.inverted.len() - 1);
        handle
    }

    /// Advance one body by one tick
    pub fn step(&mut self, handle: BodyHandle, body: &mut Body) {
        match &mut self.engine {
            Engine::Kinematic(engine) => engine.update(handle, body),
            Engine::RigidBody(engine) => engine.step(handle, body),
        }
    }

    /// Recreate the engine with `handle`'s gravity set to `inverted`.
    /// Bodies keep their handles; transient state (forces, friction
    /// overrides) starts fresh.
    pub fn rebuild(&mut self, handle: BodyHandle, inverted: bool) {
        if let Some(flag) = self.inverted.get_mut(handle.0) {
            *flag = inverted;
        }
        self.engine = Self::build_engine(&self.config, self.walls.clone(), &self.inverted);
        self.rebuilds += 1;
        debug!(
            "physics rebuilt ({:?}, body {} inverted={}, rebuild #{})",
            self.config.mode, handle.0, inverted, self.rebuilds
        );
    }

    pub fn rebuild_count(&self) -> u32 {
        self.rebuilds
    }

    pub fn is_inverted(&self, handle: BodyHandle) -> bool {
        self.inverted.get(handle.0).copied().unwrap_or(false)
    }

    pub fn mode(&self) -> PhysicsMode {
        self.config.mode
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}
