//! Key bindings
//!
//! One `ControlSet` per player. An action may be bound to several keys
//! (Up and Space both jump on the arrow preset). The two presets use
//! disjoint keys so two players can share a keyboard.

use macroquad::input::KeyCode;
use serde::{Deserialize, Serialize};

use super::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSet {
    bindings: Vec<(KeyCode, Action)>,
}

impl ControlSet {
    pub fn new(bindings: Vec<(KeyCode, Action)>) -> Self {
        Self { bindings }
    }

    /// Arrow keys: Left/Right move, Up or Space jump, Down flips gravity
    pub fn arrows() -> Self {
        Self::new(vec![
            (KeyCode::Left, Action::MoveLeft),
            (KeyCode::Right, Action::MoveRight),
            (KeyCode::Up, Action::Jump),
            (KeyCode::Space, Action::Jump),
            (KeyCode::Down, Action::ToggleGravity),
        ])
    }

    /// A/D move, W jumps, Caps Lock flips gravity
    pub fn wasd() -> Self {
        Self::new(vec![
            (KeyCode::A, Action::MoveLeft),
            (KeyCode::D, Action::MoveRight),
            (KeyCode::W, Action::Jump),
            (KeyCode::CapsLock, Action::ToggleGravity),
        ])
    }

    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, action)| *action)
    }

    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = KeyCode> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, a)| *a == action)
            .map(|(k, _)| *k)
    }

    /// Do the two sets share any key?
    pub fn conflicts_with(&self, other: &ControlSet) -> bool {
        self.bindings
            .iter()
            .any(|(key, _)| other.action_for(*key).is_some())
    }
}

/// Named binding presets, as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlPreset {
    Arrows,
    Wasd,
}

impl ControlPreset {
    pub fn control_set(self) -> ControlSet {
        match self {
            ControlPreset::Arrows => ControlSet::arrows(),
            ControlPreset::Wasd => ControlSet::wasd(),
        }
    }
}
