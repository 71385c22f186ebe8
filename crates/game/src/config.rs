//! Game configuration. Loaded from `catch_the_drop.ron` at startup.

use engine_core::{ColorMode, SceneRect};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::{EngineSettings, BASELINE_GRAVITY_FACTOR};
use crate::shapes::ShapeSet;

pub const CONFIG_FILE: &str = "catch_the_drop.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config syntax: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Persistent game settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Displayed frames per second the loop aims for.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// The loop never lowers its target below this.
    #[serde(default = "default_min_frame_rate")]
    pub min_frame_rate: f64,
    /// Physics ticks per displayed frame.
    #[serde(default = "default_intra_frames")]
    pub intra_frames: u32,
    #[serde(default = "default_max_things")]
    pub max_things: usize,
    /// New shapes per second.
    #[serde(default = "default_drop_rate")]
    pub drop_rate: f64,
    /// Shape radius as a fraction of scene height.
    #[serde(default = "default_shape_size")]
    pub shape_size: f64,
    #[serde(default = "default_gravity_factor")]
    pub gravity_factor: f64,
    #[serde(default)]
    pub shapes: ShapeSet,
    #[serde(default)]
    pub color: ColorMode,
    #[serde(default = "default_scene_width")]
    pub scene_width: f64,
    #[serde(default = "default_scene_height")]
    pub scene_height: f64,
    /// How long the headless demo runs.
    #[serde(default = "default_demo_seconds")]
    pub demo_seconds: u64,
}

fn default_frame_rate() -> f64 {
    70.0
}
fn default_min_frame_rate() -> f64 {
    15.0
}
fn default_intra_frames() -> u32 {
    3
}
fn default_max_things() -> usize {
    80
}
fn default_drop_rate() -> f64 {
    2.5
}
fn default_shape_size() -> f64 {
    0.032
}
fn default_gravity_factor() -> f64 {
    BASELINE_GRAVITY_FACTOR
}
fn default_scene_width() -> f64 {
    640.0
}
fn default_scene_height() -> f64 {
    480.0
}
fn default_demo_seconds() -> u64 {
    10
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            min_frame_rate: default_min_frame_rate(),
            intra_frames: default_intra_frames(),
            max_things: default_max_things(),
            drop_rate: default_drop_rate(),
            shape_size: default_shape_size(),
            gravity_factor: default_gravity_factor(),
            shapes: ShapeSet::default(),
            color: ColorMode::default(),
            scene_width: default_scene_width(),
            scene_height: default_scene_height(),
            demo_seconds: default_demo_seconds(),
        }
    }
}

impl GameConfig {
    /// Load config from `catch_the_drop.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron_str(&data)
    }

    /// Parse and validate a RON document. Missing fields take their defaults.
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate > 0.0) {
            return Err(ConfigError::Invalid(format!("frame_rate must be positive, got {}", self.frame_rate)));
        }
        if !(self.min_frame_rate > 0.0) || self.min_frame_rate > self.frame_rate {
            return Err(ConfigError::Invalid(format!(
                "min_frame_rate must be in (0, {}], got {}",
                self.frame_rate, self.min_frame_rate
            )));
        }
        if self.intra_frames == 0 {
            return Err(ConfigError::Invalid("intra_frames must be at least 1".into()));
        }
        if self.drop_rate < 0.0 || self.gravity_factor < 0.0 {
            return Err(ConfigError::Invalid("drop_rate and gravity_factor cannot be negative".into()));
        }
        if !(self.shape_size > 0.0 && self.shape_size <= 0.5) {
            return Err(ConfigError::Invalid(format!("shape_size must be in (0, 0.5], got {}", self.shape_size)));
        }
        if !(self.scene_width > 0.0 && self.scene_height > 0.0) {
            return Err(ConfigError::Invalid("scene must have a positive size".into()));
        }
        Ok(())
    }

    pub fn scene(&self) -> SceneRect {
        SceneRect::new(self.scene_width, self.scene_height)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            frame_rate: self.frame_rate,
            intra_frames: self.intra_frames,
            max_things: self.max_things,
            drop_rate: self.drop_rate,
            shape_size: self.shape_size,
            gravity_factor: self.gravity_factor,
            shapes: self.shapes,
            color_mode: self.color,
            scene: self.scene(),
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(CONFIG_FILE)
}
