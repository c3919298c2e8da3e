//! Game configuration
//!
//! Loaded from a RON file: the path in `TILEHOP_CONFIG`, else
//! `assets/config.ron`. Every section is `#[serde(default)]`, so a config
//! file only has to mention the values it changes. A missing file means
//! "use the defaults"; a file that exists but does not parse is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::input::{ControlPreset, ControlSet};
use crate::physics::PhysicsMode;
use crate::world::LayerName;

/// Environment variable overriding the config path
pub const CONFIG_ENV: &str = "TILEHOP_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "assets/config.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 768,
            title: "Platformer".to_string(),
        }
    }
}

/// Simple platformer engine tuning. Units are pixels per frame at 60 Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicTuning {
    /// Added to downward velocity every frame
    pub gravity: f32,
    /// Horizontal speed cap
    pub max_speed: f32,
    /// Per-frame speed change while accelerating or coasting
    pub acceleration: f32,
    pub jump_speed: f32,
    /// How far the grounded check probes toward the floor
    pub ground_probe: f32,
}

impl Default for KinematicTuning {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            max_speed: 10.0,
            acceleration: 0.9,
            jump_speed: 20.0,
            ground_probe: 5.0,
        }
    }
}

/// Force/impulse engine tuning. Units are pixels and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidBodyTuning {
    pub gravity: f32,
    /// Fraction of velocity kept per second (1.0 = no loss)
    pub default_damping: f32,
    pub player_damping: f32,
    pub player_friction: f32,
    pub wall_friction: f32,
    pub player_mass: f32,
    pub max_horizontal_speed: f32,
    pub max_vertical_speed: f32,
    pub move_force_on_ground: f32,
    pub move_force_in_air: f32,
    pub jump_impulse: f32,
    pub step_seconds: f32,
    pub ground_probe: f32,
}

impl Default for RigidBodyTuning {
    fn default() -> Self {
        Self {
            gravity: 2600.0,
            default_damping: 1.0,
            player_damping: 0.4,
            player_friction: 1.0,
            wall_friction: 0.7,
            player_mass: 2.0,
            max_horizontal_speed: 650.0,
            max_vertical_speed: 1600.0,
            move_force_on_ground: 8000.0,
            move_force_in_air: 900.0,
            jump_impulse: 1800.0,
            step_seconds: 1.0 / 60.0,
            ground_probe: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub mode: PhysicsMode,
    pub kinematic: KinematicTuning,
    pub rigid_body: RigidBodyTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub coin_value: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { coin_value: 5 }
    }
}

/// Per-layer loader options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Layers that get a spatial hash for overlap queries
    pub spatial_hash: Vec<LayerName>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            spatial_hash: vec![
                LayerName::Platforms,
                LayerName::Items,
                LayerName::Depth,
                LayerName::Boxes,
            ],
        }
    }
}

impl LayerConfig {
    pub fn uses_spatial_hash(&self, layer: LayerName) -> bool {
        self.spatial_hash.contains(&layer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Collision box (width, height)
    pub size: (f32, f32),
    /// Sprite facing right; mirrored when facing left
    pub texture: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: (48.0, 96.0),
            texture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered each frame
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { smoothing: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub coin: Option<String>,
    pub jump: Option<String>,
    pub death: Option<String>,
    pub level_complete: Option<String>,
    pub music: Option<String>,
    pub volume: f32,
    pub music_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            coin: None,
            jump: None,
            death: None,
            level_complete: None,
            music: None,
            volume: 0.5,
            music_volume: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub scoring: ScoringConfig,
    /// Level files in play order
    pub levels: Vec<PathBuf>,
    pub layers: LayerConfig,
    pub player: PlayerConfig,
    /// One entry per local player
    pub players: Vec<ControlPreset>,
    pub camera: CameraConfig,
    pub audio: AudioConfig,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            physics: PhysicsConfig::default(),
            scoring: ScoringConfig::default(),
            levels: vec![
                PathBuf::from("assets/levels/level_0.ron"),
                PathBuf::from("assets/levels/level_1.ron"),
            ],
            layers: LayerConfig::default(),
            player: PlayerConfig::default(),
            players: vec![ControlPreset::Arrows],
            camera: CameraConfig::default(),
            audio: AudioConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Config path from the environment, else the default location
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn require_positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)))
    }
}

fn require_non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must not be negative, got {}", name, value)))
    }
}

fn require_fraction(name: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be within 0..=1, got {}", name, value)))
    }
}

impl GameConfig {
    /// Load and validate. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_ron_str(&contents)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.physics.kinematic;
        require_positive("physics.kinematic.gravity", k.gravity)?;
        require_positive("physics.kinematic.max_speed", k.max_speed)?;
        require_positive("physics.kinematic.acceleration", k.acceleration)?;
        require_positive("physics.kinematic.jump_speed", k.jump_speed)?;
        require_positive("physics.kinematic.ground_probe", k.ground_probe)?;

        let r = &self.physics.rigid_body;
        require_positive("physics.rigid_body.gravity", r.gravity)?;
        require_positive("physics.rigid_body.player_mass", r.player_mass)?;
        require_positive("physics.rigid_body.max_horizontal_speed", r.max_horizontal_speed)?;
        require_positive("physics.rigid_body.max_vertical_speed", r.max_vertical_speed)?;
        require_positive("physics.rigid_body.step_seconds", r.step_seconds)?;
        require_positive("physics.rigid_body.ground_probe", r.ground_probe)?;
        require_positive("physics.rigid_body.move_force_on_ground", r.move_force_on_ground)?;
        require_positive("physics.rigid_body.move_force_in_air", r.move_force_in_air)?;
        require_positive("physics.rigid_body.jump_impulse", r.jump_impulse)?;
        require_non_negative("physics.rigid_body.player_friction", r.player_friction)?;
        require_non_negative("physics.rigid_body.wall_friction", r.wall_friction)?;
        require_fraction("physics.rigid_body.default_damping", r.default_damping)?;
        require_fraction("physics.rigid_body.player_damping", r.player_damping)?;

        require_positive("player.size.0", self.player.size.0)?;
        require_positive("player.size.1", self.player.size.1)?;
        require_fraction("camera.smoothing", self.camera.smoothing)?;

        if self.scoring.coin_value == 0 {
            return Err(ConfigError::Invalid("scoring.coin_value must be at least 1".to_string()));
        }
        if self.players.is_empty() {
            return Err(ConfigError::Invalid("at least one player is required".to_string()));
        }

        let sets = self.control_sets();
        for (i, a) in sets.iter().enumerate() {
            for (j, b) in sets.iter().enumerate().skip(i + 1) {
                if a.conflicts_with(b) {
                    return Err(ConfigError::Invalid(format!(
                        "players[{}] and players[{}] share key bindings", i, j
                    )));
                }
            }
        }
        Ok(())
    }

    /// Control bindings for every configured player, in spawn order
    pub fn control_sets(&self) -> Vec<ControlSet> {
        self.players.iter().map(|p| p.control_set()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.coin_value, 5);
        assert_eq!(config.physics.mode, PhysicsMode::Kinematic);
        assert!(config.layers.uses_spatial_hash(LayerName::Platforms));
        assert!(!config.layers.uses_spatial_hash(LayerName::Death));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GameConfig::from_ron_str(
            "(scoring: (coin_value: 10), physics: (mode: RigidBody))",
        )
        .unwrap();
        assert_eq!(config.scoring.coin_value, 10);
        assert_eq!(config.physics.mode, PhysicsMode::RigidBody);
        assert_eq!(config.physics.rigid_body.jump_impulse, 1800.0);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.levels.len(), 2);
    }

    #[test]
    fn test_parse_error() {
        let result = GameConfig::from_ron_str("(scoring: (coin_value: \"lots\"))");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_bad_physics() {
        let result = GameConfig::from_ron_str("(physics: (kinematic: (gravity: -1.0)))");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_reversed_rigid_body_tuning() {
        for field in [
            "move_force_on_ground: -8000.0",
            "move_force_in_air: -900.0",
            "jump_impulse: 0.0",
            "player_friction: -1.0",
            "wall_friction: -0.7",
        ] {
            let text = format!("(physics: (rigid_body: ({})))", field);
            let result = GameConfig::from_ron_str(&text);
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "{} accepted", field);
        }

        let frictionless = GameConfig::from_ron_str("(physics: (rigid_body: (wall_friction: 0.0)))");
        assert!(frictionless.is_ok());
    }

    #[test]
    fn test_rejects_conflicting_players() {
        let result = GameConfig::from_ron_str("(players: [Arrows, Arrows])");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let ok = GameConfig::from_ron_str("(players: [Arrows, Wasd])").unwrap();
        assert_eq!(ok.control_sets().len(), 2);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(dir.path().join("nope.ron")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = GameConfig::load(path).unwrap();
        assert_eq!(config.physics, PhysicsConfig::default());
        assert_eq!(config.levels, GameConfig::default().levels);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(window: (title: \"Test\"), levels: [\"a.ron\"])").unwrap();
        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.levels, vec![PathBuf::from("a.ron")]);
    }
}
