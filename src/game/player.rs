//! Player state and key handling
//!
//! A player owns its body, its key bindings and the flags for which
//! actions are held. It never reaches back into the session: gravity flips
//! go out through the `GravityControl` capability passed to `on_key_press`.

use macroquad::input::KeyCode;
use macroquad::math::{vec2, Vec2};
use tracing::{debug, info};

use super::locomotion::Facing;
use crate::input::{Action, ControlSet};
use crate::physics::{Aabb, Body, BodyHandle, PhysicsWorld};

/// Held-action flags, each cleared on release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PressedInputs {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub toggle_gravity: bool,
}

impl PressedInputs {
    fn flag_mut(&mut self, action: Action) -> &mut bool {
        match action {
            Action::MoveLeft => &mut self.left,
            Action::MoveRight => &mut self.right,
            Action::Jump => &mut self.jump,
            Action::ToggleGravity => &mut self.toggle_gravity,
        }
    }
}

/// Whatever owns the physics world, as seen by a player flipping gravity
pub trait GravityControl {
    fn set_gravity_inverted(&mut self, handle: BodyHandle, inverted: bool);
}

impl GravityControl for PhysicsWorld {
    fn set_gravity_inverted(&mut self, handle: BodyHandle, inverted: bool) {
        self.rebuild(handle, inverted);
    }
}

pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub pressed: PressedInputs,
    gravity_inverted: bool,
    controls: ControlSet,
    /// Feet position at level start
    spawn: Vec2,
    handle: BodyHandle,
}

impl Player {
    /// `spawn` is the feet position (bottom center of the body)
    pub fn new(controls: ControlSet, spawn: Vec2, size: Vec2, handle: BodyHandle) -> Self {
        Self {
            body: Body::new(spawn + vec2(0.0, size.y * 0.5), size),
            facing: Facing::Right,
            pressed: PressedInputs::default(),
            gravity_inverted: false,
            controls,
            spawn,
            handle,
        }
    }

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    pub fn gravity_inverted(&self) -> bool {
        self.gravity_inverted
    }

    pub fn controls(&self) -> &ControlSet {
        &self.controls
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    /// Handle a key going down. Returns true if gravity flipped.
    /// Keys outside this player's bindings are ignored.
    pub fn on_key_press(&mut self, key: KeyCode, gravity: &mut dyn GravityControl) -> bool {
        let Some(action) = self.controls.action_for(key) else {
            return false;
        };
        debug!("body {} {:?} -> {}", self.handle.0, key, action.label());
        let flag = self.pressed.flag_mut(action);
        let was_down = *flag;
        *flag = true;

        // Key repeat arrives as more presses; only the edge flips
        if action == Action::ToggleGravity && !was_down {
            self.toggle_gravity(gravity);
            return true;
        }
        false
    }

    /// Handle a key going up. Clears the action even if another key bound
    /// to it is still down.
    pub fn on_key_release(&mut self, key: KeyCode) {
        if let Some(action) = self.controls.action_for(key) {
            *self.pressed.flag_mut(action) = false;
        }
    }

    pub fn toggle_gravity(&mut self, gravity: &mut dyn GravityControl) {
        self.gravity_inverted = !self.gravity_inverted;
        gravity.set_gravity_inverted(self.handle, self.gravity_inverted);
        info!(
            "body {} gravity {}",
            self.handle.0,
            if self.gravity_inverted { "inverted" } else { "normal" }
        );
    }
}
