//! Page-facing game handle
//!
//! The web build exports [`WebGame`] to JavaScript. The page owns physics,
//! rendering and audio: it forwards lifecycle calls, taps and exits, ticks the
//! game from `requestAnimationFrame`, and drains the session's events as JSON.
//! New best scores never reach the page as work to do; they are persisted here
//! before the events are handed over.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use glam::Vec2;

use crate::config::{ConfigError, GameConfig, PlayArea};
use crate::platform::storage::ScoreStore;
use crate::sim::{ColorIndex, CubeHandle, GameSession, SessionEvent};

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub struct WebGame {
    session: GameSession,
    store: Box<dyn ScoreStore>,
}

impl WebGame {
    pub fn with_store(
        config: GameConfig,
        mut store: Box<dyn ScoreStore>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let best = crate::platform::storage::load_best_score(store.as_mut());
        let session = GameSession::new(config, best, seed)?;
        Ok(Self { session, store })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Queued events, with best-score writes already applied to the store
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        let events = self.session.drain_events();
        for event in &events {
            if let SessionEvent::PersistBestScore(best) = event {
                if let Err(e) = self.store.persist(*best) {
                    log::warn!("Failed to persist best score {}: {}", best, e);
                }
            }
        }
        events
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl WebGame {
    /// Config and best score from LocalStorage, seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsError> {
        let config = GameConfig::load();
        let seed = config.seed.unwrap_or_else(crate::platform::entropy_seed);
        Self::with_store(config, crate::platform::storage::default_store(), seed)
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl WebGame {
    pub fn start(&mut self) -> bool {
        self.session.start()
    }

    pub fn restart(&mut self) -> bool {
        self.session.restart()
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn pause(&mut self) -> bool {
        self.session.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.session.resume()
    }

    pub fn tick(&mut self, dt: f32) {
        self.session.tick(dt);
    }

    /// A cube was tapped
    pub fn pop(&mut self, handle: u64, color: u8, x: f32, y: f32) {
        self.session
            .cube_popped(CubeHandle(handle), ColorIndex(color), Vec2::new(x, y));
    }

    /// A cube left the play area
    pub fn miss(&mut self, handle: u64, color: u8, x: f32, y: f32) {
        self.session
            .cube_missed(CubeHandle(handle), ColorIndex(color), Vec2::new(x, y));
    }

    /// Latest physics position of a cube
    pub fn moved(&mut self, handle: u64, x: f32, y: f32) {
        self.session.cube_moved(CubeHandle(handle), Vec2::new(x, y));
    }

    pub fn set_play_area(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> bool {
        self.session.set_play_area(PlayArea {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        })
    }

    pub fn score(&self) -> u64 {
        self.session.state().score()
    }

    pub fn best_score(&self) -> u64 {
        self.session.state().best_score()
    }

    pub fn paused(&self) -> bool {
        self.session.is_paused()
    }

    /// Drain queued events as a JSON array
    pub fn drain_events(&mut self) -> String {
        let events = self.take_events();
        match serde_json::to_string(&events) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Dropping {} events, JSON encoding failed: {}", events.len(), e);
                "[]".to_string()
            }
        }
    }
}

/// Logging and panic hook for the page
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!(
            "Cube Pop starting (input {:?})",
            crate::platform::Platform::detect()
        );
    }
}
