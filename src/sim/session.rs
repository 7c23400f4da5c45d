//! Game session orchestration
//!
//! `Idle -> Playing -> GameOver -> Playing (restart) -> ...`, with pause as a
//! flag that only exists while playing. All collaborator traffic goes through
//! the event outbox; the host drains it once per frame.
//!
//! Frame contract: the host delivers that frame's input events, then calls
//! [`GameSession::tick`] for the next frame. A retarget caused by a correct
//! pop is applied at the start of the following tick, so every event of the
//! frame that scored is judged against the old target.

use glam::Vec2;

use super::events::{FeedbackKind, InputEvent, SessionEvent};
use super::launch::plan_launch;
use super::rng::{RandomSource, SeededRandom};
use super::scheduler::SpawnScheduler;
use super::spawn::{SpawnHistory, SpawnRules, next_spawn_color};
use super::state::{ColorIndex, CubeHandle, MissOutcome, Outcome, SessionState};
use super::target::{TargetHistory, TargetRules, next_target};
use crate::config::{ConfigError, GameConfig, PlayArea};

/// Lifecycle phase (pause is tracked separately in [`SessionState`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Not started, or stopped
    Idle,
    Playing,
    GameOver,
}

/// A live cube that has not been popped or missed yet
#[derive(Debug, Clone, Copy, PartialEq)]
struct LiveCube {
    handle: CubeHandle,
    color: ColorIndex,
    /// Launch origin until the physics layer reports a newer one
    position: Vec2,
}

pub struct GameSession<R: RandomSource = SeededRandom> {
    config: GameConfig,
    play_area: PlayArea,
    phase: SessionPhase,
    state: SessionState,
    spawn_history: SpawnHistory,
    target_history: TargetHistory,
    scheduler: SpawnScheduler,
    /// Policy draws (spawn color, target)
    rng: R,
    /// Launch jitter, kept apart so policy draws stay scriptable
    launch_rng: SeededRandom,
    retarget_pending: bool,
    /// Sorted by handle
    cubes: Vec<LiveCube>,
    next_handle: u64,
    events: Vec<SessionEvent>,
}

impl GameSession<SeededRandom> {
    /// Create an idle session seeded with `seed`
    pub fn new(config: GameConfig, best_score: u64, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = SeededRandom::new(seed);
        let launch_rng = rng.fork();
        Self::with_rng(config, best_score, rng, launch_rng)
    }
}

impl<R: RandomSource> GameSession<R> {
    /// Create an idle session with explicit random sources
    pub fn with_rng(
        config: GameConfig,
        best_score: u64,
        rng: R,
        launch_rng: SeededRandom,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = SessionState::new(best_score, config.max_misses);
        let scheduler = SpawnScheduler::new(config.spawn_interval);
        Ok(Self {
            play_area: config.play_area,
            config,
            phase: SessionPhase::Idle,
            state,
            spawn_history: SpawnHistory::default(),
            target_history: TargetHistory::default(),
            scheduler,
            rng,
            launch_rng,
            retarget_pending: false,
            cubes: Vec::new(),
            next_handle: 1,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn target(&self) -> ColorIndex {
        self.state.target()
    }

    /// Outcome of the current (or last) run
    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused()
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    pub fn spawn_history(&self) -> &SpawnHistory {
        &self.spawn_history
    }

    pub fn target_history(&self) -> &TargetHistory {
        &self.target_history
    }

    /// A correct pop is waiting for the next tick to pick a new target
    pub fn retarget_pending(&self) -> bool {
        self.retarget_pending
    }

    /// Handles of cubes still in flight
    pub fn live_cubes(&self) -> impl Iterator<Item = CubeHandle> + '_ {
        self.cubes.iter().map(|c| c.handle)
    }

    pub fn live_cube_count(&self) -> usize {
        self.cubes.len()
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn play_area(&self) -> PlayArea {
        self.play_area
    }

    /// Visible world rectangle for future launches. Empty areas are ignored.
    pub fn set_play_area(&mut self, area: PlayArea) -> bool {
        if area.is_empty() {
            log::warn!("Ignoring empty play area {:?}", area);
            return false;
        }
        self.play_area = area;
        true
    }

    /// Latest position of a live cube, used for its clear effect
    pub fn cube_moved(&mut self, handle: CubeHandle, position: Vec2) {
        if let Ok(pos) = self.cubes.binary_search_by_key(&handle, |c| c.handle) {
            self.cubes[pos].position = position;
        }
    }

    // === Lifecycle ===

    /// Idle/GameOver -> Playing
    pub fn start(&mut self) -> bool {
        if self.phase == SessionPhase::Playing {
            log::debug!("start() ignored, already playing");
            return false;
        }
        self.begin_run();
        true
    }

    /// GameOver or Playing (paused or not) -> fresh run, clearing live cubes first
    pub fn restart(&mut self) -> bool {
        if self.phase == SessionPhase::Idle {
            log::debug!("restart() ignored, session idle");
            return false;
        }
        self.scheduler.stop();
        self.clear_cubes();
        if self.state.paused() {
            self.state.set_paused(false);
            self.events.push(SessionEvent::PauseChanged(false));
        }
        self.begin_run();
        true
    }

    /// End the session without a game over (quit)
    pub fn stop(&mut self) {
        if self.phase == SessionPhase::Idle {
            return;
        }
        self.scheduler.stop();
        self.retarget_pending = false;
        self.clear_cubes();
        if self.state.paused() {
            self.state.set_paused(false);
            self.events.push(SessionEvent::PauseChanged(false));
        }
        self.phase = SessionPhase::Idle;
        log::info!("Session stopped (score {})", self.state.score());
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Playing || self.state.paused() {
            return false;
        }
        self.state.set_paused(true);
        self.scheduler.freeze();
        self.events.push(SessionEvent::PauseChanged(true));
        log::info!("Paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Playing || !self.state.paused() {
            return false;
        }
        self.state.set_paused(false);
        self.scheduler.thaw();
        self.events.push(SessionEvent::PauseChanged(false));
        log::info!("Resumed");
        true
    }

    // === Frame ===

    /// Advance one frame by `dt` seconds of game time
    pub fn tick(&mut self, dt: f32) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        // Deferred from the previous frame's scoring pop
        if self.retarget_pending {
            self.retarget_pending = false;
            if !self.state.outcome().is_terminal() {
                self.retarget();
            }
        }

        let due = self.scheduler.advance(dt);
        for _ in 0..due {
            self.spawn_cube();
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Popped {
                handle,
                color,
                position,
            } => self.cube_popped(handle, color, position),
            InputEvent::Missed {
                handle,
                color,
                position,
            } => self.cube_missed(handle, color, position),
        }
    }

    /// A cube was tapped
    pub fn cube_popped(&mut self, handle: CubeHandle, color: ColorIndex, position: Vec2) {
        if self.phase != SessionPhase::Playing || self.state.paused() {
            log::debug!("Dropping pop of {:?} ({:?}, paused {})", handle, self.phase, self.state.paused());
            return;
        }
        let Some(color) = self.acknowledge(handle, color) else {
            return;
        };

        if color == self.state.target() {
            if let Some(update) = self.state.on_correct_pop(color) {
                self.feedback(FeedbackKind::Correct, color, position);
                if update.new_best {
                    self.events.push(SessionEvent::PersistBestScore(update.best_score));
                }
                self.events.push(SessionEvent::ScoreChanged {
                    score: update.score,
                    best_score: update.best_score,
                });
                self.retarget_pending = true;
            }
        } else if self.state.on_wrong_pop(color) {
            self.feedback(FeedbackKind::Wrong, color, position);
            self.end_run();
        }

        self.events.push(SessionEvent::DestroyCube(handle));
    }

    /// A cube left the play area unpopped. While paused or after game over the
    /// cube is only released, never scored.
    pub fn cube_missed(&mut self, handle: CubeHandle, color: ColorIndex, position: Vec2) {
        match self.phase {
            SessionPhase::Playing if !self.state.paused() => {}
            SessionPhase::Playing | SessionPhase::GameOver => {
                // Nothing to score, but the cube is gone
                if self.acknowledge(handle, color).is_some() {
                    self.events.push(SessionEvent::DestroyCube(handle));
                }
                return;
            }
            SessionPhase::Idle => {
                log::debug!("Dropping miss of {:?} ({:?})", handle, self.phase);
                return;
            }
        }
        let Some(color) = self.acknowledge(handle, color) else {
            return;
        };

        match self.state.on_miss(color) {
            MissOutcome::Ignored | MissOutcome::NotTarget => {}
            MissOutcome::Marked { index } => {
                self.feedback(FeedbackKind::Miss, color, position);
                self.events.push(SessionEvent::MissActivated(index));
            }
            MissOutcome::Exhausted { index } => {
                self.feedback(FeedbackKind::Miss, color, position);
                self.events.push(SessionEvent::MissActivated(index));
                self.end_run();
            }
        }

        self.events.push(SessionEvent::DestroyCube(handle));
    }

    // === Internals ===

    fn begin_run(&mut self) {
        self.state.reset();
        self.spawn_history = SpawnHistory::default();
        self.target_history = TargetHistory::default();
        self.retarget_pending = false;
        self.phase = SessionPhase::Playing;

        self.events.push(SessionEvent::SessionStarted);
        // Target must be visible before the first spawn
        self.retarget();
        self.events.push(SessionEvent::ScoreChanged {
            score: self.state.score(),
            best_score: self.state.best_score(),
        });
        self.scheduler.start();

        log::info!(
            "Run started: target {}, best {}",
            self.state.target(),
            self.state.best_score()
        );
    }

    fn end_run(&mut self) {
        let Some(reason) = self.state.outcome().reason() else {
            return;
        };
        self.scheduler.stop();
        self.retarget_pending = false;
        self.phase = SessionPhase::GameOver;
        self.events.push(SessionEvent::GameOver(reason));
        log::info!("Game over ({:?}), score {}", reason, self.state.score());
    }

    fn retarget(&mut self) {
        let rules = TargetRules {
            color_count: self.config.color_count,
            max_target_repeats: self.config.max_target_repeats,
        };
        let (target, history) = next_target(&self.target_history, &rules, &mut self.rng);
        self.target_history = history;
        self.state.set_target(target);
        self.events.push(SessionEvent::TargetChanged(target));
    }

    fn spawn_cube(&mut self) {
        let rules = SpawnRules {
            color_count: self.config.color_count,
            max_non_target_spawns: self.config.max_non_target_spawns,
        };
        let (color, history) =
            next_spawn_color(&self.spawn_history, self.state.target(), &rules, &mut self.rng);
        self.spawn_history = history;

        let launch = plan_launch(&self.play_area, &self.config, &mut self.launch_rng);
        let handle = CubeHandle(self.next_handle);
        self.next_handle += 1;

        self.cubes.push(LiveCube {
            handle,
            color,
            position: launch.origin,
        });
        self.events.push(SessionEvent::SpawnCube {
            handle,
            color,
            launch,
        });
    }

    /// Consume a live cube's single acknowledgement. Returns its tracked color,
    /// or `None` if the handle is unknown or already consumed.
    fn acknowledge(&mut self, handle: CubeHandle, reported: ColorIndex) -> Option<ColorIndex> {
        let Ok(pos) = self.cubes.binary_search_by_key(&handle, |c| c.handle) else {
            log::debug!("Ignoring event for untracked cube {:?}", handle);
            return None;
        };
        let cube = self.cubes.remove(pos);
        if cube.color != reported {
            log::warn!(
                "Cube {:?} reported as {} but spawned as {}",
                handle,
                reported,
                cube.color
            );
        }
        Some(cube.color)
    }

    /// Every live cube bursts where it is, then the world is emptied
    fn clear_cubes(&mut self) {
        for cube in std::mem::take(&mut self.cubes) {
            self.feedback(FeedbackKind::Cleared, cube.color, cube.position);
        }
        self.events.push(SessionEvent::DestroyAllCubes);
    }

    fn feedback(&mut self, kind: FeedbackKind, color: ColorIndex, position: Vec2) {
        self.events.push(SessionEvent::Feedback {
            kind,
            color,
            position,
        });
    }
}
