//! Outbound requests and notifications
//!
//! The session never calls rendering, audio or storage directly. It queues
//! events that the host drains once per frame, in order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::launch::LaunchPlan;
use super::state::{ColorIndex, CubeHandle, GameOverReason};

/// Cosmetic effect to play (particles + sound)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Correct,
    Wrong,
    Miss,
    /// Cube removed by a restart or stop (particles only)
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Materialize and launch a cube
    SpawnCube {
        handle: CubeHandle,
        color: ColorIndex,
        launch: LaunchPlan,
    },
    /// Remove one cube
    DestroyCube(CubeHandle),
    /// Remove every live cube
    DestroyAllCubes,
    Feedback {
        kind: FeedbackKind,
        color: ColorIndex,
        position: Vec2,
    },
    /// Store and flush a new best score
    PersistBestScore(u64),
    ScoreChanged { score: u64, best_score: u64 },
    TargetChanged(ColorIndex),
    /// Miss marker `index` (0-based) lit up
    MissActivated(u32),
    GameOver(GameOverReason),
    /// A fresh run began (markers cleared, game-over texts hidden)
    SessionStarted,
    PauseChanged(bool),
}

/// Normalized input from the physics/input layer (already deduplicated
/// per physical tap)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A cube was tapped
    Popped {
        handle: CubeHandle,
        color: ColorIndex,
        position: Vec2,
    },
    /// A cube left the play area unpopped
    Missed {
        handle: CubeHandle,
        color: ColorIndex,
        position: Vec2,
    },
}
