//! Key event collection
//!
//! Turns macroquad's per-frame pressed/released key sets into an ordered
//! list of discrete events. Presses come before releases so a key tapped
//! within a single frame still ends up released.

use macroquad::input::{get_keys_pressed, get_keys_released, KeyCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub fn pressed(key: KeyCode) -> Self {
        Self { key, kind: KeyEventKind::Pressed }
    }

    pub fn released(key: KeyCode) -> Self {
        Self { key, kind: KeyEventKind::Released }
    }
}

#[derive(Default)]
pub struct InputState {
    events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once per frame, before the update ticks
    pub fn poll(&mut self) {
        let mut released: Vec<KeyCode> = get_keys_released().into_iter().collect();
        let mut pressed: Vec<KeyCode> = get_keys_pressed().into_iter().collect();
        // HashSet order is arbitrary; keep frames reproducible
        released.sort_by_key(|k| *k as u32);
        pressed.sort_by_key(|k| *k as u32);
        self.push_frame(&pressed, &released);
    }

    fn push_frame(&mut self, pressed: &[KeyCode], released: &[KeyCode]) {
        for &key in pressed {
            // Pressed and released in the same frame: press, then release
            self.events.push(KeyEvent::pressed(key));
        }
        for &key in released {
            self.events.push(KeyEvent::released(key));
        }
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, KeyEvent> {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
