//! Keyboard input
//!
//! Raw key events from macroquad, per-player key bindings, and the logical
//! actions gameplay code works with.

mod actions;
mod controls;
mod state;

pub use actions::Action;
pub use controls::{ControlPreset, ControlSet};
pub use state::{InputState, KeyEvent, KeyEventKind};
