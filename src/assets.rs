//! Asset loading
//!
//! Textures and sounds named in the config. Everything is optional in the
//! config, but a path that is configured and fails to load is fatal.

use macroquad::audio::{load_sound, Sound};
use macroquad::texture::{load_texture, FilterMode, Texture2D};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load {kind} {path}: {message}")]
    Load {
        kind: &'static str,
        path: String,
        message: String,
    },
}

pub async fn load_texture_file(path: &str) -> Result<Texture2D, AssetError> {
    let texture = load_texture(path).await.map_err(|e| AssetError::Load {
        kind: "texture",
        path: path.to_string(),
        message: e.to_string(),
    })?;
    texture.set_filter(FilterMode::Nearest);
    info!("loaded texture {} ({}x{})", path, texture.width(), texture.height());
    Ok(texture)
}

pub async fn load_sound_file(path: &str) -> Result<Sound, AssetError> {
    let sound = load_sound(path).await.map_err(|e| AssetError::Load {
        kind: "sound",
        path: path.to_string(),
        message: e.to_string(),
    })?;
    info!("loaded sound {}", path);
    Ok(sound)
}
