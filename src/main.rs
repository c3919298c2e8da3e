//! TILEHOP: a tile-based 2D platformer
//!
//! Run through a list of levels collecting every coin while avoiding
//! spikes. Any player can flip their own gravity and walk on ceilings.
//! - Two physics modes: simple kinematic or force-based rigid body
//! - RON level files (optionally brotli packed)
//! - Local multiplayer on one keyboard

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod assets;
mod audio;
mod config;
mod game;
mod input;
mod physics;
mod world;

use macroquad::prelude::*;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assets::AssetError;
use audio::SoundBank;
use config::{ConfigError, GameConfig};
use game::{draw_session, GamePhase, Overlay, Session, Textures};
use input::InputState;
use world::{LevelCatalog, LevelError};

/// Fixed update rate
const TICK_SECONDS: f32 = 1.0 / 60.0;
/// Update ticks allowed per rendered frame before time is dropped
const MAX_STEPS_PER_FRAME: u32 = 5;
const LEVEL_COMPLETE_SECONDS: f32 = 2.0;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Accumulates real frame time and hands out fixed steps
#[derive(Debug, Clone, Copy, Default)]
struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    /// Number of ticks to run for a frame that took `dt` seconds
    fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= TICK_SECONDS && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= TICK_SECONDS;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            // Stalled: drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(TICK_SECONDS);
        }
        steps
    }
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn window_conf() -> Conf {
    // Window size is read before logging exists; a bad config is reported
    // properly once main runs
    let window = GameConfig::load(config::config_path())
        .map(|c| c.window)
        .unwrap_or_default();
    Conf {
        window_title: format!("{} v{}", window.title, VERSION),
        window_width: window.width as i32,
        window_height: window.height as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

async fn run() -> Result<(), StartupError> {
    let config = GameConfig::load(config::config_path())?;
    init_logging(&config.log_level);
    info!("tilehop v{} starting, {} level(s)", VERSION, config.levels.len());

    let catalog = LevelCatalog::from_paths(config.levels.iter().cloned());
    let textures = Textures::load(&config.player).await?;
    let sounds = SoundBank::load(&config.audio).await?;
    let mut session = Session::new(&config, catalog, vec2(screen_width(), screen_height()))?;

    let mut input = InputState::new();
    let mut clock = FrameClock::default();
    let mut overlay = Overlay::default();
    sounds.start_music();

    loop {
        if is_key_pressed(KeyCode::Escape) {
            info!("quit");
            break;
        }

        session.set_viewport(vec2(screen_width(), screen_height()));
        input.poll();
        for event in input.drain() {
            session.handle_key(event);
        }

        let dt = get_frame_time();
        for _ in 0..clock.advance(dt) {
            session.tick()?;
            if session.phase() == GamePhase::WorldComplete {
                break;
            }
        }

        if let Some(done) = session.events.level_complete.iter().last() {
            overlay.show(format!("Level {} complete", done.level + 1), LEVEL_COMPLETE_SECONDS);
        }
        overlay.update(dt);
        sounds.handle_events(&session.events);
        session.events.clear_all();

        draw_session(&session, &textures, &overlay);
        next_frame().await;
    }
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    if let Err(e) = run().await {
        // Logging may not be up yet if the config itself failed
        eprintln!("tilehop: {}", e);
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_steps_at_fixed_rate() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(TICK_SECONDS * 0.5), 0);
        assert_eq!(clock.advance(TICK_SECONDS * 0.6), 1);
        assert_eq!(clock.advance(TICK_SECONDS * 2.0), 2);
    }

    #[test]
    fn test_clock_drops_backlog_after_stall() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(1.0), MAX_STEPS_PER_FRAME);
        // At most one tick carried over
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_clock_ignores_negative_time() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(TICK_SECONDS), 1);
    }
}
