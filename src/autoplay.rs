//! Headless demo player
//!
//! Watches the session's spawn requests, gives every cube a flight time and,
//! when it comes down, either taps it or lets it leave the play area. Target
//! cubes are tapped with probability `skill`; other cubes are tapped by
//! mistake with probability `blunder`. Draws come from a seeded stream, so a
//! demo is reproducible from its seed.

use glam::Vec2;

use crate::host::{Collaborators, pump_input};
use crate::platform::input::InputSource;
use crate::sim::{
    ColorIndex, CubeHandle, FeedbackKind, GameOverReason, GameSession, InputEvent, RandomSource,
    SeededRandom, SessionEvent, SessionPhase,
};

/// Demo player tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoplayConfig {
    /// Chance of tapping a target-colored cube
    pub skill: f32,
    /// Chance of tapping a cube of another color
    pub blunder: f32,
    /// Mean seconds a cube stays up
    pub flight_time: f32,
    /// Flight time varies by +/- this fraction
    pub flight_jitter: f32,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            skill: 0.9,
            blunder: 0.02,
            flight_time: 2.0,
            flight_jitter: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    handle: CubeHandle,
    color: ColorIndex,
    position: Vec2,
    lands_at: f64,
}

/// Simulated player. Feed it the session's events with [`AutoPlayer::observe`],
/// advance it with [`AutoPlayer::advance`], and poll it as an [`InputSource`].
pub struct AutoPlayer {
    config: AutoplayConfig,
    rng: SeededRandom,
    clock: f64,
    in_flight: Vec<Flight>,
    ready: Vec<InputEvent>,
}

impl AutoPlayer {
    pub fn new(config: AutoplayConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SeededRandom::new(seed),
            clock: 0.0,
            in_flight: Vec::new(),
            ready: Vec::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Track spawns and removals
    pub fn observe(&mut self, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::SpawnCube {
                    handle,
                    color,
                    launch,
                } => {
                    let jitter = self
                        .rng
                        .next_range(-self.config.flight_jitter, self.config.flight_jitter);
                    let flight = f64::from(self.config.flight_time * (1.0 + jitter)).max(0.0);
                    self.in_flight.push(Flight {
                        handle: *handle,
                        color: *color,
                        position: launch.origin,
                        lands_at: self.clock + flight,
                    });
                }
                SessionEvent::DestroyCube(handle) => {
                    self.in_flight.retain(|f| f.handle != *handle);
                }
                SessionEvent::DestroyAllCubes => {
                    self.in_flight.clear();
                    self.ready.clear();
                }
                _ => {}
            }
        }
    }

    /// Move the player's clock and decide on every cube that came down
    pub fn advance(&mut self, dt: f32, target: ColorIndex) {
        self.clock += f64::from(dt.max(0.0));

        let clock = self.clock;
        let (landed, flying): (Vec<Flight>, Vec<Flight>) =
            self.in_flight.drain(..).partition(|f| f.lands_at <= clock);
        self.in_flight = flying;

        for flight in landed {
            let tap_chance = if flight.color == target {
                self.config.skill
            } else {
                self.config.blunder
            };
            let event = if self.rng.chance(tap_chance) {
                InputEvent::Popped {
                    handle: flight.handle,
                    color: flight.color,
                    position: flight.position,
                }
            } else {
                InputEvent::Missed {
                    handle: flight.handle,
                    color: flight.color,
                    position: flight.position,
                }
            };
            self.ready.push(event);
        }
    }
}

impl InputSource for AutoPlayer {
    fn poll(&mut self, out: &mut Vec<InputEvent>) {
        out.append(&mut self.ready);
    }
}

/// Totals of a demo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoSummary {
    pub seconds: f64,
    pub spawned: u64,
    pub pops: u64,
    pub markers_lost: u64,
    pub wrong_cube_endings: u32,
    pub miss_endings: u32,
    pub best_score: u64,
}

impl DemoSummary {
    pub fn runs_finished(&self) -> u32 {
        self.wrong_cube_endings + self.miss_endings
    }

    fn record(&mut self, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::SpawnCube { .. } => self.spawned += 1,
                SessionEvent::Feedback {
                    kind: FeedbackKind::Correct,
                    ..
                } => self.pops += 1,
                SessionEvent::MissActivated(_) => self.markers_lost += 1,
                SessionEvent::GameOver(GameOverReason::WrongCube) => self.wrong_cube_endings += 1,
                SessionEvent::GameOver(GameOverReason::MissesExhausted) => self.miss_endings += 1,
                _ => {}
            }
        }
    }
}

/// Play for `seconds` of game time in steps of `dt`, restarting after every
/// game over. Events still reach `collaborators`.
pub fn run_demo<R: RandomSource>(
    session: &mut GameSession<R>,
    player: &mut AutoPlayer,
    collaborators: &mut Collaborators,
    seconds: f64,
    dt: f32,
) -> DemoSummary {
    let mut summary = DemoSummary::default();
    if !(dt.is_finite() && dt > 0.0) {
        log::warn!("Demo step {} is not positive, nothing simulated", dt);
        return summary;
    }

    session.start();
    let mut elapsed = 0.0f64;
    while elapsed < seconds {
        if session.phase() == SessionPhase::GameOver {
            session.restart();
        }

        player.advance(dt, session.target());
        pump_input(player, session);
        session.tick(dt);

        let events = session.drain_events();
        player.observe(&events);
        summary.record(&events);
        collaborators.dispatch(events);

        elapsed += f64::from(dt);
    }

    summary.seconds = elapsed;
    summary.best_score = session.state().best_score();
    log::info!(
        "Demo finished after {:.1}s: {} spawned, {} popped, {} runs ended",
        summary.seconds,
        summary.spawned,
        summary.pops,
        summary.runs_finished()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::SIM_DT;
    use crate::platform::storage::MemoryStore;
    use crate::sim::{Edge, LaunchPlan};
    use glam::Vec3;

    fn demo(config: AutoplayConfig, seed: u64, seconds: f64) -> DemoSummary {
        let mut session = GameSession::new(GameConfig::default(), 0, seed).unwrap();
        let mut player = AutoPlayer::new(config, seed ^ 0xa5a5);
        let mut collaborators = Collaborators::new();
        run_demo(&mut session, &mut player, &mut collaborators, seconds, SIM_DT)
    }

    fn spawn(handle: u32, color: u8) -> SessionEvent {
        SessionEvent::SpawnCube {
            handle: CubeHandle(u64::from(handle)),
            color: ColorIndex(color),
            launch: LaunchPlan {
                edge: Edge::Bottom,
                origin: Vec2::new(1.0, -9.0),
                impulse: Vec2::Y,
                torque: Vec3::ZERO,
            },
        }
    }

    #[test]
    fn test_player_taps_target_and_lets_others_go() {
        let config = AutoplayConfig {
            skill: 1.0,
            blunder: 0.0,
            flight_time: 1.0,
            flight_jitter: 0.0,
        };
        let mut player = AutoPlayer::new(config, 1);
        player.observe(&[spawn(1, 0), spawn(2, 1)]);

        player.advance(0.5, ColorIndex(0));
        let mut out = Vec::new();
        player.poll(&mut out);
        assert!(out.is_empty());

        player.advance(0.5, ColorIndex(0));
        player.poll(&mut out);
        assert_eq!(
            out,
            vec![
                InputEvent::Popped {
                    handle: CubeHandle(1),
                    color: ColorIndex(0),
                    position: Vec2::new(1.0, -9.0),
                },
                InputEvent::Missed {
                    handle: CubeHandle(2),
                    color: ColorIndex(1),
                    position: Vec2::new(1.0, -9.0),
                },
            ]
        );
        assert_eq!(player.in_flight(), 0);
    }

    #[test]
    fn test_destroy_all_forgets_cubes() {
        let mut player = AutoPlayer::new(AutoplayConfig::default(), 2);
        player.observe(&[spawn(1, 0), spawn(2, 2), SessionEvent::DestroyCube(CubeHandle(1))]);
        assert_eq!(player.in_flight(), 1);
        player.observe(&[SessionEvent::DestroyAllCubes]);
        assert_eq!(player.in_flight(), 0);
    }

    #[test]
    fn test_perfect_player_never_loses() {
        let config = AutoplayConfig {
            skill: 1.0,
            blunder: 0.0,
            ..Default::default()
        };
        let summary = demo(config, 5, 60.0);
        assert_eq!(summary.runs_finished(), 0);
        assert_eq!(summary.markers_lost, 0);
        assert!(summary.pops > 0);
        assert_eq!(summary.best_score, summary.pops);
    }

    #[test]
    fn test_idle_player_runs_out_of_misses() {
        let config = AutoplayConfig {
            skill: 0.0,
            blunder: 0.0,
            ..Default::default()
        };
        let summary = demo(config, 9, 120.0);
        assert_eq!(summary.pops, 0);
        assert_eq!(summary.wrong_cube_endings, 0);
        assert!(summary.miss_endings >= 1);
        // The last run may still be in progress
        let finished = 3 * u64::from(summary.miss_endings);
        assert!(summary.markers_lost >= finished && summary.markers_lost < finished + 3);
    }

    #[test]
    fn test_demo_is_reproducible() {
        let a = demo(AutoplayConfig::default(), 42, 30.0);
        let b = demo(AutoplayConfig::default(), 42, 30.0);
        assert_eq!(a, b);
        assert!(a.spawned > 0);
    }

    #[test]
    fn test_new_best_reaches_store() {
        let config = AutoplayConfig {
            skill: 1.0,
            blunder: 0.0,
            ..Default::default()
        };
        let mut session = GameSession::new(GameConfig::default(), 0, 3).unwrap();
        let mut player = AutoPlayer::new(config, 4);
        let mut collaborators = Collaborators::new().with_store(Box::new(MemoryStore::new(0)));

        let summary = run_demo(&mut session, &mut player, &mut collaborators, 30.0, SIM_DT);
        let stored = collaborators.store.as_mut().unwrap().load().unwrap();
        assert_eq!(stored, summary.best_score);
    }
}
