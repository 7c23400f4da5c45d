//! Cube Pop - tap only the cube that matches the target color
//!
//! Core modules:
//! - `sim`: Deterministic gameplay core (spawn/target policies, session state machine)
//! - `platform`: Browser/native platform abstraction (input normalization, storage)
//! - `host`: Collaborator traits and event dispatch for the rendering/audio/UI layers
//! - `config`: Data-driven game constants
//! - `best_score`: Best-score bookkeeping
//! - `autoplay`: Headless demo player
//! - `web`: Game handle exported to the page on wasm32

pub mod autoplay;
pub mod best_score;
pub mod config;
pub mod host;
pub mod platform;
pub mod sim;
pub mod web;

pub use best_score::{BestScore, BestScoreRecord};
pub use config::{ConfigError, GameConfig, PlayArea};
pub use host::Collaborators;
pub use web::WebGame;

/// Game configuration constants (reference tuning)
pub mod consts {
    /// Number of cube colors (red, yellow, blue)
    pub const COLOR_COUNT: u8 = 3;
    /// Seconds between spawns
    pub const SPAWN_INTERVAL: f32 = 1.5;
    /// Guarantee the target cube within this many spawns (0 disables)
    pub const MAX_NON_TARGET_SPAWNS: u32 = 3;
    /// Maximum times the same target can repeat in a row
    pub const MAX_TARGET_REPEATS: u32 = 2;
    /// Number of miss markers
    pub const MAX_MISSES: u32 = 3;

    /// Probability of forcing the target when the drought streak hits the limit
    pub const DROUGHT_FORCE_CHANCE: f32 = 0.8;
    /// Probability of rejecting a repeated target (anti-toggle bias)
    pub const REPEAT_REJECT_CHANCE: f32 = 0.5;
    /// Draw attempts before the target picker keeps whatever it drew last
    pub const MAX_TARGET_ATTEMPTS: u32 = 10;
    /// Redraw cap for the same-color streak rule
    pub const MAX_STREAK_REDRAWS: u32 = 32;
    /// Same color may spawn at most this many times in a row
    pub const MAX_SAME_COLOR_STREAK: u32 = 2;

    /// Launch defaults
    pub const TOSS_FORCE: f32 = 8.0;
    pub const SIDEWAYS_FORCE: f32 = 2.0;
    pub const SPIN_SPEED: f32 = 5.0;
    pub const CUBE_SIZE: f32 = 1.0;
    /// Distance outside the play area that cubes spawn at
    pub const SPAWN_MARGIN: f32 = 1.0;

    /// Fixed simulation timestep for the headless demo (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum spawn timer fires per tick to prevent spiral of death
    pub const MAX_FIRES_PER_TICK: u32 = 4;
}
