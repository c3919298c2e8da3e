//! Sound effects and music
//!
//! Sounds are picked from the session's events after the update ticks, so
//! gameplay code never touches the audio device.

use std::collections::HashMap;

use macroquad::audio::{play_sound, PlaySoundParams, Sound};
use tracing::debug;

use crate::assets::{load_sound_file, AssetError};
use crate::config::AudioConfig;
use crate::game::Events;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Coin,
    Jump,
    Death,
    LevelComplete,
    Music,
}

/// Sounds with a configured path
pub fn configured_sounds(config: &AudioConfig) -> Vec<(SoundId, &str)> {
    [
        (SoundId::Coin, &config.coin),
        (SoundId::Jump, &config.jump),
        (SoundId::Death, &config.death),
        (SoundId::LevelComplete, &config.level_complete),
        (SoundId::Music, &config.music),
    ]
    .into_iter()
    .filter_map(|(id, path)| path.as_deref().map(|p| (id, p)))
    .collect()
}

/// Effects to play for this frame's events, in a fixed order
pub fn sounds_for(events: &Events) -> Vec<SoundId> {
    let mut sounds = Vec::new();
    if !events.coin_collected.is_empty() {
        sounds.push(SoundId::Coin);
    }
    if !events.jumped.is_empty() {
        sounds.push(SoundId::Jump);
    }
    if !events.player_died.is_empty() {
        sounds.push(SoundId::Death);
    }
    if !events.level_complete.is_empty() {
        sounds.push(SoundId::LevelComplete);
    }
    sounds
}

pub struct SoundBank {
    sounds: HashMap<SoundId, Sound>,
    volume: f32,
    music_volume: f32,
}

impl SoundBank {
    pub async fn load(config: &AudioConfig) -> Result<Self, AssetError> {
        let mut sounds = HashMap::new();
        for (id, path) in configured_sounds(config) {
            sounds.insert(id, load_sound_file(path).await?);
        }
        Ok(Self {
            sounds,
            volume: config.volume,
            music_volume: config.music_volume,
        })
    }

    /// Play a sound if it was configured
    pub fn play(&self, id: SoundId, volume: f32, looped: bool) {
        if let Some(sound) = self.sounds.get(&id) {
            play_sound(sound, PlaySoundParams { looped, volume });
        }
    }

    pub fn start_music(&self) {
        self.play(SoundId::Music, self.music_volume, true);
    }

    pub fn handle_events(&self, events: &Events) {
        for id in sounds_for(events) {
            debug!("sound {:?}", id);
            self.play(id, self.volume, false);
        }
    }
}
