//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Seeds (wall clock)
//! - Input events (mouse vs touch)
//! - Storage (LocalStorage on web, a JSON file on native)

pub mod input;
pub mod storage;

pub use input::{InputSource, Platform, PointerKind, PointerPhase, PointerSample, QueuedInput, TapFilter};
pub use storage::{MemoryStore, ScoreStore, StoreError};

/// Seed for a fresh run when the config does not pin one
#[cfg(target_arch = "wasm32")]
pub fn entropy_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for a fresh run when the config does not pin one
#[cfg(not(target_arch = "wasm32"))]
pub fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}
