//! Renderer
//!
//! Draws the session with macroquad: sprite layers back to front through
//! the follow camera (world space, y up), then the HUD in screen space.
//! Tiles are flat colored boxes; the player uses a texture when one is
//! configured.

use macroquad::prelude::*;

use super::locomotion::Facing;
use super::player::Player;
use super::session::{GamePhase, Session};
use crate::assets::{load_texture_file, AssetError};
use crate::config::PlayerConfig;
use crate::world::LayerName;

const SKY_COLOR: Color = Color::new(0.39, 0.58, 0.93, 1.0);
const HUD_TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const OVERLAY_BG: Color = Color::new(0.0, 0.0, 0.0, 0.5);
const PLAYER_COLOR: Color = Color::new(0.95, 0.55, 0.2, 1.0);
const PLAYER_INVERTED_COLOR: Color = Color::new(0.7, 0.35, 0.9, 1.0);

const HUD_FONT_SIZE: f32 = 30.0;
const BANNER_FONT_SIZE: f32 = 64.0;

fn layer_color(layer: LayerName) -> Color {
    match layer {
        LayerName::Background => Color::new(0.3, 0.45, 0.75, 1.0),
        LayerName::Depth => Color::new(0.25, 0.3, 0.4, 1.0),
        LayerName::Platforms => Color::new(0.35, 0.6, 0.25, 1.0),
        LayerName::Boxes => Color::new(0.6, 0.42, 0.22, 1.0),
        LayerName::Items => Color::new(1.0, 0.84, 0.0, 1.0),
        LayerName::Death => Color::new(0.85, 0.1, 0.1, 1.0),
        LayerName::Decoration => Color::new(0.9, 0.9, 0.6, 1.0),
        LayerName::Player => PLAYER_COLOR,
    }
}

pub struct Textures {
    /// Faces right; mirrored for left
    player: Option<Texture2D>,
}

impl Textures {
    pub async fn load(config: &PlayerConfig) -> Result<Self, AssetError> {
        let player = match &config.texture {
            Some(path) => Some(load_texture_file(path).await?),
            None => None,
        };
        Ok(Self { player })
    }
}

/// A timed message in the middle of the screen
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    text: Option<String>,
    remaining: f32,
}

impl Overlay {
    pub fn show(&mut self, text: impl Into<String>, seconds: f32) {
        self.text = Some(text.into());
        self.remaining = seconds;
    }

    pub fn update(&mut self, dt: f32) {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.text = None;
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

fn draw_player(player: &Player, textures: &Textures) {
    let aabb = player.aabb();
    let min = aabb.min();
    let size = aabb.size();
    match &textures.player {
        Some(texture) => draw_texture_ex(
            texture,
            min.x,
            min.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(size),
                flip_x: player.facing == Facing::Left,
                // Camera is y-up; upright sprites need flipping, inverted ones don't
                flip_y: !player.gravity_inverted(),
                ..Default::default()
            },
        ),
        None => {
            let color = if player.gravity_inverted() {
                PLAYER_INVERTED_COLOR
            } else {
                PLAYER_COLOR
            };
            draw_rectangle(min.x, min.y, size.x, size.y, color);
            // Eye on the facing side
            let eye_x = aabb.center.x + player.facing.sign() * size.x * 0.25;
            let eye_y = if player.gravity_inverted() {
                min.y + size.y * 0.25
            } else {
                min.y + size.y * 0.75
            };
            draw_circle(eye_x, eye_y, size.x * 0.1, BLACK);
        }
    }
}

/// Draw the world through the follow camera
pub fn draw_world(session: &Session, textures: &Textures) {
    clear_background(SKY_COLOR);
    set_camera(&session.camera().to_camera2d());

    for layer in session.scene().layers() {
        if layer.name() == LayerName::Player {
            for player in session.players() {
                draw_player(player, textures);
            }
            continue;
        }
        let color = layer_color(layer.name());
        for (_, aabb) in layer.iter() {
            if layer.name() == LayerName::Items {
                draw_circle(aabb.center.x, aabb.center.y, aabb.half.x, color);
            } else {
                let min = aabb.min();
                draw_rectangle(min.x, min.y, aabb.size().x, aabb.size().y, color);
            }
        }
    }

    set_default_camera();
}

fn draw_centered(text: &str, y: f32, font_size: f32) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    draw_text(text, (screen_width() - dims.width) * 0.5, y, font_size, HUD_TEXT);
}

/// Score in the bottom-left corner, overlays in the middle
pub fn draw_hud(session: &Session, overlay: &Overlay) {
    let state = session.state();
    draw_text(
        &format!("Score: {}", state.score),
        10.0,
        screen_height() - 10.0,
        HUD_FONT_SIZE,
        HUD_TEXT,
    );

    let banner = match state.phase {
        GamePhase::WorldComplete => Some("You win!"),
        _ => overlay.text(),
    };
    if let Some(text) = banner {
        let y = screen_height() * 0.5;
        draw_rectangle(0.0, y - BANNER_FONT_SIZE, screen_width(), BANNER_FONT_SIZE * 1.5, OVERLAY_BG);
        draw_centered(text, y, BANNER_FONT_SIZE);
    }
}

pub fn draw_session(session: &Session, textures: &Textures, overlay: &Overlay) {
    draw_world(session, textures);
    draw_hud(session, overlay);
}
