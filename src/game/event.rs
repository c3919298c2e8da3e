//! Event System
//!
//! The session reports what happened during a tick through typed queues
//! instead of calling into audio or presentation code. The main loop reads
//! them after the update ticks (sounds, overlays) and clears them once per
//! rendered frame.
//!
//! Example flow:
//! 1. Session sees a player overlap a coin → sends CoinCollected
//! 2. Audio plays the coin sound
//! 3. Logging records the new score

use macroquad::math::Vec2;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    /// Check if there are any events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of events in queue
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all game events.
/// Add new event types as fields here.
pub struct Events {
    /// A coin was picked up
    pub coin_collected: EventQueue<CoinCollected>,

    /// A player jumped
    pub jumped: EventQueue<Jumped>,

    /// A player flipped gravity
    pub gravity_flipped: EventQueue<GravityFlipped>,

    /// A player touched a death tile
    pub player_died: EventQueue<PlayerDied>,

    /// Every coin of the level collected
    pub level_complete: EventQueue<LevelComplete>,

    /// Played past the last level
    pub world_complete: EventQueue<WorldComplete>,

    /// A level was (re)loaded
    pub level_loaded: EventQueue<LevelLoaded>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            coin_collected: EventQueue::new(),
            jumped: EventQueue::new(),
            gravity_flipped: EventQueue::new(),
            player_died: EventQueue::new(),
            level_complete: EventQueue::new(),
            world_complete: EventQueue::new(),
            level_loaded: EventQueue::new(),
        }
    }

    /// Clear all event queues. Call at end of frame.
    pub fn clear_all(&mut self) {
        self.coin_collected.clear();
        self.jumped.clear();
        self.gravity_flipped.clear();
        self.player_died.clear();
        self.level_complete.clear();
        self.world_complete.clear();
        self.level_loaded.clear();
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Event Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinCollected {
    /// Index of the collecting player
    pub player: usize,
    pub position: Vec2,
    /// Score after this coin
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jumped {
    pub player: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityFlipped {
    pub player: usize,
    pub inverted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerDied {
    pub player: usize,
    /// Where they died
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelComplete {
    pub level: usize,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldComplete {
    /// Number of levels played through
    pub levels: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelLoaded {
    pub level: usize,
    pub name: String,
    /// True when reloaded after a death
    pub reset: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue() {
        let mut queue: EventQueue<i32> = EventQueue::new();

        queue.send(1);
        queue.send(2);
        queue.send(3);

        assert_eq!(queue.len(), 3);

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_container() {
        let mut events = Events::new();

        events.player_died.send(PlayerDied {
            player: 0,
            position: Vec2::ZERO,
        });
        events.jumped.send(Jumped { player: 1 });

        assert_eq!(events.player_died.len(), 1);
        assert_eq!(events.jumped.iter().next(), Some(&Jumped { player: 1 }));

        events.clear_all();
        assert!(events.player_died.is_empty());
        assert!(events.jumped.is_empty());
    }
}
