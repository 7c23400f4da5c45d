//! Deterministic gameplay core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Game time only (fed in through `tick`)
//! - Injected random sources only
//! - Single-threaded, no locking
//! - No rendering, audio, storage or platform dependencies

pub mod events;
pub mod launch;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod spawn;
pub mod state;
pub mod target;

pub use events::{FeedbackKind, InputEvent, SessionEvent};
pub use launch::{Edge, LaunchPlan, plan_launch};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use scheduler::SpawnScheduler;
pub use session::{GameSession, SessionPhase};
pub use spawn::{SpawnHistory, SpawnRules, next_spawn_color};
pub use state::{
    ColorIndex, CubeHandle, GameOverReason, MissOutcome, Outcome, ScoreUpdate, SessionState,
};
pub use target::{TargetHistory, TargetRules, next_target};
