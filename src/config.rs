//! Game configuration
//!
//! All constants are fixed when a session is created. Stored as JSON
//! (LocalStorage on web, an optional file on native); missing fields fall
//! back to the reference tuning in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Environment variable naming a JSON config file (native only)
pub const CONFIG_ENV: &str = "CUBE_POP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("color_count must be at least 2 (got {0})")]
    TooFewColors(u8),
    #[error("spawn_interval must be a positive number of seconds (got {0})")]
    BadSpawnInterval(f32),
    #[error("max_target_repeats must be at least 1")]
    ZeroTargetRepeats,
    #[error("max_misses must be at least 1")]
    ZeroMisses,
    #[error("play area is empty: min {min} max {max}")]
    EmptyPlayArea { min: Vec2, max: Vec2 },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Visible world rectangle cubes are launched into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            min: Vec2::new(-4.5, -8.0),
            max: Vec2::new(4.5, 8.0),
        }
    }
}

impl PlayArea {
    pub fn is_empty(&self) -> bool {
        !(self.max.x > self.min.x && self.max.y > self.min.y)
    }
}

/// Session tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Rules ===
    /// Number of cube colors
    pub color_count: u8,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Guarantee the target within this many spawns (0 disables)
    pub max_non_target_spawns: u32,
    /// Maximum times the same target can repeat in a row
    pub max_target_repeats: u32,
    /// Number of miss markers
    pub max_misses: u32,

    // === Launch ===
    pub toss_force: f32,
    pub sideways_force: f32,
    pub spin_speed: f32,
    pub cube_size: f32,
    pub play_area: PlayArea,

    /// Fixed seed for reproducible runs (random when absent)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            color_count: COLOR_COUNT,
            spawn_interval: SPAWN_INTERVAL,
            max_non_target_spawns: MAX_NON_TARGET_SPAWNS,
            max_target_repeats: MAX_TARGET_REPEATS,
            max_misses: MAX_MISSES,

            toss_force: TOSS_FORCE,
            sideways_force: SIDEWAYS_FORCE,
            spin_speed: SPIN_SPEED,
            cube_size: CUBE_SIZE,
            play_area: PlayArea::default(),

            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.color_count < 2 {
            return Err(ConfigError::TooFewColors(self.color_count));
        }
        if !(self.spawn_interval.is_finite() && self.spawn_interval > 0.0) {
            return Err(ConfigError::BadSpawnInterval(self.spawn_interval));
        }
        if self.max_target_repeats == 0 {
            return Err(ConfigError::ZeroTargetRepeats);
        }
        if self.max_misses == 0 {
            return Err(ConfigError::ZeroMisses);
        }
        if self.play_area.is_empty() {
            return Err(ConfigError::EmptyPlayArea {
                min: self.play_area.min,
                max: self.play_area.max,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cube_pop_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Load config from the file named by `CUBE_POP_CONFIG`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            log::info!("Using default config");
            return Self::default();
        };

        match Self::from_path(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path, e);
                Self::default()
            }
        }
    }
}
