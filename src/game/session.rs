//! Game session
//!
//! Owns everything for the level being played and runs the fixed-step
//! tick: locomotion and physics per player, camera follow, coin pickup,
//! death and completion checks. Deaths and level advances are recorded as
//! a pending transition and applied at the end of the tick that caused
//! them, never on a timer.

use macroquad::math::{vec2, Vec2};
use tracing::{debug, info};

use super::camera::FollowCamera;
use super::event::{
    CoinCollected, Events, GravityFlipped, Jumped, LevelComplete, LevelLoaded, PlayerDied,
    WorldComplete,
};
use super::locomotion::update_player;
use super::player::Player;
use super::scene::Scene;
use crate::config::GameConfig;
use crate::input::{Action, KeyEvent, KeyEventKind};
use crate::physics::PhysicsWorld;
use crate::world::{Level, LevelCatalog, LevelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Every coin collected; the next level loads at the end of the tick
    LevelComplete,
    /// Played past the last level. Ticks do nothing from here on.
    WorldComplete,
}

/// Scheduled during a tick, applied at its end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Reload the current level from scratch
    Reset,
    /// Load the next level
    Advance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelState {
    pub index: usize,
    pub name: String,
    pub score: u32,
    /// `coin_value` times the number of coins at load
    pub max_score: u32,
    pub phase: GamePhase,
}

pub struct Session {
    config: GameConfig,
    catalog: LevelCatalog,
    /// Current level as loaded, kept for resets
    level: Level,
    state: LevelState,
    scene: Scene,
    physics: PhysicsWorld,
    players: Vec<Player>,
    camera: FollowCamera,
    pending: Option<Transition>,
    pub events: Events,
}

impl Session {
    /// Load the first level of `catalog`
    pub fn new(config: &GameConfig, catalog: LevelCatalog, viewport: Vec2) -> Result<Self, LevelError> {
        let level = catalog
            .load(0)?
            .ok_or_else(|| LevelError::Validation("no levels configured".to_string()))?;

        let (scene, physics, players) = Self::build_level(config, &level);
        let mut session = Self {
            config: config.clone(),
            catalog,
            state: LevelState {
                index: 0,
                name: level.name.clone(),
                score: 0,
                max_score: 0,
                phase: GamePhase::Playing,
            },
            level,
            scene,
            physics,
            players,
            camera: FollowCamera::new(viewport),
            pending: None,
            events: Events::new(),
        };
        for (i, player) in session.players.iter().enumerate() {
            let bindings: Vec<String> = Action::ALL
                .iter()
                .map(|&action| {
                    let keys: Vec<_> = player.controls().keys_for(action).collect();
                    format!("{}={:?}", action.label(), keys)
                })
                .collect();
            debug!("player {} controls: {}", i, bindings.join(", "));
        }
        session.start_level(0, false);
        Ok(session)
    }

    /// Build the scene, physics and players for `level`
    fn build_level(config: &GameConfig, level: &Level) -> (Scene, PhysicsWorld, Vec<Player>) {
        let scene = Scene::from_level(level, &config.layers);
        let mut physics = PhysicsWorld::new(&config.physics, scene.walls().clone());

        let tile = level.tile_size;
        let start = level.start_position().unwrap_or(vec2(tile * 0.5, tile));
        let size = vec2(config.player.size.0, config.player.size.1);
        let players = config
            .control_sets()
            .into_iter()
            .enumerate()
            .map(|(i, controls)| {
                let handle = physics.add_body();
                let spawn = start + vec2(i as f32 * tile, 0.0);
                Player::new(controls, spawn, size, handle)
            })
            .collect();
        (scene, physics, players)
    }

    fn setup_level(&mut self, level: Level, index: usize, reset: bool) {
        let (scene, physics, players) = Self::build_level(&self.config, &level);
        self.scene = scene;
        self.physics = physics;
        self.players = players;
        self.level = level;
        self.start_level(index, reset);
    }

    /// Fresh score state for the level just built
    fn start_level(&mut self, index: usize, reset: bool) {
        let coins = self.level.coin_count() as u32;
        self.state = LevelState {
            index,
            name: self.level.name.clone(),
            score: 0,
            max_score: coins * self.config.scoring.coin_value,
            phase: GamePhase::Playing,
        };
        self.snap_camera();

        info!(
            "{} level {} '{}' ({} coins, {:?} physics)",
            if reset { "reset" } else { "loaded" },
            index,
            self.state.name,
            coins,
            self.physics.mode()
        );
        self.events.level_loaded.send(LevelLoaded {
            level: index,
            name: self.state.name.clone(),
            reset,
        });
    }

    fn camera_target(&self) -> Option<Vec2> {
        self.players
            .first()
            .map(|p| self.camera.target_for(p.position(), self.scene.map_size()))
    }

    fn snap_camera(&mut self) {
        if let Some(target) = self.camera_target() {
            self.camera.snap_to(target);
        }
    }

    /// Route a key event to every player that binds the key
    pub fn handle_key(&mut self, event: KeyEvent) {
        for (i, player) in self.players.iter_mut().enumerate() {
            match event.kind {
                KeyEventKind::Pressed => {
                    if player.on_key_press(event.key, &mut self.physics) {
                        self.events.gravity_flipped.send(GravityFlipped {
                            player: i,
                            inverted: player.gravity_inverted(),
                        });
                    }
                }
                KeyEventKind::Released => player.on_key_release(event.key),
            }
        }
    }

    /// One fixed step. Errors only when a level that has to be loaded
    /// cannot be.
    pub fn tick(&mut self) -> Result<(), LevelError> {
        if self.state.phase == GamePhase::WorldComplete {
            return Ok(());
        }

        for (i, player) in self.players.iter_mut().enumerate() {
            if update_player(player, &mut self.physics) {
                self.events.jumped.send(Jumped { player: i });
            }
            self.physics.step(player.handle(), &mut player.body);
        }

        if let Some(target) = self.camera_target() {
            self.camera.move_to(target, self.config.camera.smoothing);
        }

        let mut collected = false;
        for (i, player) in self.players.iter().enumerate() {
            for position in self.scene.collect_coins(&player.aabb()) {
                collected = true;
                self.state.score =
                    (self.state.score + self.config.scoring.coin_value).min(self.state.max_score);
                debug!("player {} coin at {:?}, score {}", i, position, self.state.score);
                self.events.coin_collected.send(CoinCollected {
                    player: i,
                    position,
                    score: self.state.score,
                });
            }
        }

        if let Some((i, player)) = self
            .players
            .iter()
            .enumerate()
            .find(|(_, p)| self.scene.touches_death(&p.aabb()))
        {
            info!("player {} died in level {}", i, self.state.index);
            self.events.player_died.send(PlayerDied {
                player: i,
                position: player.position(),
            });
            self.pending = Some(Transition::Reset);
        }

        if self.pending.is_none()
            && collected
            && self.state.phase == GamePhase::Playing
            && self.state.score >= self.state.max_score
        {
            info!("level {} complete, score {}", self.state.index, self.state.score);
            self.state.phase = GamePhase::LevelComplete;
            self.events.level_complete.send(LevelComplete {
                level: self.state.index,
                score: self.state.score,
            });
            self.pending = Some(Transition::Advance);
        }

        self.apply_pending()
    }

    fn apply_pending(&mut self) -> Result<(), LevelError> {
        match self.pending.take() {
            None => Ok(()),
            Some(Transition::Reset) => {
                let level = self.level.clone();
                self.setup_level(level, self.state.index, true);
                Ok(())
            }
            Some(Transition::Advance) => {
                let next = self.state.index + 1;
                match self.catalog.load(next)? {
                    Some(level) => self.setup_level(level, next, false),
                    None => {
                        info!("all {} levels complete", self.catalog.len());
                        self.state.phase = GamePhase::WorldComplete;
                        self.events.world_complete.send(WorldComplete {
                            levels: self.catalog.len(),
                        });
                    }
                }
                Ok(())
            }
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        if viewport != self.camera.viewport() {
            self.camera.set_viewport(viewport);
            self.snap_camera();
        }
    }

    pub fn state(&self) -> &LevelState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }
}
