//! Host-side wiring
//!
//! The session only queues [`SessionEvent`]s. Once per frame the host drains
//! them and hands each one to whichever collaborator handles it: the physics
//! world, the feedback player (particles + sound), the presenter (HUD) and
//! the best-score store. Any of them may be missing; events for a missing
//! collaborator are skipped.

use glam::Vec2;

use crate::platform::input::InputSource;
use crate::platform::storage::ScoreStore;
use crate::sim::{
    ColorIndex, CubeHandle, FeedbackKind, GameOverReason, GameSession, LaunchPlan, RandomSource,
    SessionEvent,
};

/// Longest frame the host will simulate in one go (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Physics/scene side: owns the cube bodies
pub trait CubeWorld {
    fn spawn_cube(&mut self, handle: CubeHandle, color: ColorIndex, launch: &LaunchPlan);
    fn destroy_cube(&mut self, handle: CubeHandle);
    fn destroy_all_cubes(&mut self);
}

/// Particles and sound
pub trait FeedbackPlayer {
    fn play(&mut self, kind: FeedbackKind, color: ColorIndex, position: Vec2);
}

/// HUD and menus. Every hook is optional.
pub trait Presenter {
    fn score_changed(&mut self, _score: u64, _best_score: u64) {}
    fn target_changed(&mut self, _target: ColorIndex) {}
    fn miss_activated(&mut self, _index: u32) {}
    fn game_over(&mut self, _reason: GameOverReason) {}
    fn session_started(&mut self) {}
    fn pause_changed(&mut self, _paused: bool) {}
}

/// Optional collaborators the session's events are routed to
#[derive(Default)]
pub struct Collaborators {
    pub world: Option<Box<dyn CubeWorld>>,
    pub feedback: Option<Box<dyn FeedbackPlayer>>,
    pub presenter: Option<Box<dyn Presenter>>,
    pub store: Option<Box<dyn ScoreStore>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_world(mut self, world: Box<dyn CubeWorld>) -> Self {
        self.world = Some(world);
        self
    }

    pub fn with_feedback(mut self, feedback: Box<dyn FeedbackPlayer>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn with_store(mut self, store: Box<dyn ScoreStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Route events in order
    pub fn dispatch(&mut self, events: impl IntoIterator<Item = SessionEvent>) {
        for event in events {
            self.dispatch_one(event);
        }
    }

    fn dispatch_one(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SpawnCube {
                handle,
                color,
                launch,
            } => {
                if let Some(world) = self.world.as_mut() {
                    world.spawn_cube(handle, color, &launch);
                }
            }
            SessionEvent::DestroyCube(handle) => {
                if let Some(world) = self.world.as_mut() {
                    world.destroy_cube(handle);
                }
            }
            SessionEvent::DestroyAllCubes => {
                if let Some(world) = self.world.as_mut() {
                    world.destroy_all_cubes();
                }
            }
            SessionEvent::Feedback {
                kind,
                color,
                position,
            } => {
                if let Some(feedback) = self.feedback.as_mut() {
                    feedback.play(kind, color, position);
                }
            }
            SessionEvent::PersistBestScore(best) => {
                if let Some(store) = self.store.as_mut() {
                    if let Err(e) = store.persist(best) {
                        log::warn!("Failed to persist best score {}: {}", best, e);
                    }
                }
            }
            SessionEvent::ScoreChanged { score, best_score } => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.score_changed(score, best_score);
                }
            }
            SessionEvent::TargetChanged(target) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.target_changed(target);
                }
            }
            SessionEvent::MissActivated(index) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.miss_activated(index);
                }
            }
            SessionEvent::GameOver(reason) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.game_over(reason);
                }
            }
            SessionEvent::SessionStarted => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.session_started();
                }
            }
            SessionEvent::PauseChanged(paused) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.pause_changed(paused);
                }
            }
        }
    }
}

/// Feed everything the source gathered into the session. Returns the number
/// of events delivered.
pub fn pump_input<R: RandomSource>(
    source: &mut dyn InputSource,
    session: &mut GameSession<R>,
) -> usize {
    let mut events = Vec::new();
    source.poll(&mut events);
    let count = events.len();
    for event in events {
        session.handle_input(event);
    }
    count
}

/// One host frame: this frame's input, then the tick, then dispatch
pub fn run_frame<R: RandomSource>(
    session: &mut GameSession<R>,
    input: &mut dyn InputSource,
    collaborators: &mut Collaborators,
    dt: f32,
) {
    pump_input(input, session);
    session.tick(dt.min(MAX_FRAME_DT));
    collaborators.dispatch(session.drain_events());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::platform::input::QueuedInput;
    use crate::platform::storage::{MemoryStore, StoreError};
    use crate::sim::InputEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Spawn(CubeHandle, ColorIndex),
        Destroy(CubeHandle),
        DestroyAll,
        Play(FeedbackKind, ColorIndex),
        Score(u64, u64),
        Target(ColorIndex),
        Miss(u32),
        Over(GameOverReason),
        Started,
        Paused(bool),
        Persist(u64),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct Recorder(Log);

    impl CubeWorld for Recorder {
        fn spawn_cube(&mut self, handle: CubeHandle, color: ColorIndex, _launch: &LaunchPlan) {
            self.0.borrow_mut().push(Call::Spawn(handle, color));
        }
        fn destroy_cube(&mut self, handle: CubeHandle) {
            self.0.borrow_mut().push(Call::Destroy(handle));
        }
        fn destroy_all_cubes(&mut self) {
            self.0.borrow_mut().push(Call::DestroyAll);
        }
    }

    impl FeedbackPlayer for Recorder {
        fn play(&mut self, kind: FeedbackKind, color: ColorIndex, _position: Vec2) {
            self.0.borrow_mut().push(Call::Play(kind, color));
        }
    }

    impl Presenter for Recorder {
        fn score_changed(&mut self, score: u64, best_score: u64) {
            self.0.borrow_mut().push(Call::Score(score, best_score));
        }
        fn target_changed(&mut self, target: ColorIndex) {
            self.0.borrow_mut().push(Call::Target(target));
        }
        fn miss_activated(&mut self, index: u32) {
            self.0.borrow_mut().push(Call::Miss(index));
        }
        fn game_over(&mut self, reason: GameOverReason) {
            self.0.borrow_mut().push(Call::Over(reason));
        }
        fn session_started(&mut self) {
            self.0.borrow_mut().push(Call::Started);
        }
        fn pause_changed(&mut self, paused: bool) {
            self.0.borrow_mut().push(Call::Paused(paused));
        }
    }

    impl ScoreStore for Recorder {
        fn load(&mut self) -> Result<u64, StoreError> {
            Ok(0)
        }
        fn persist(&mut self, best_score: u64) -> Result<(), StoreError> {
            self.0.borrow_mut().push(Call::Persist(best_score));
            Ok(())
        }
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&mut self) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("test"))
        }
        fn persist(&mut self, _best_score: u64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("test"))
        }
    }

    fn full(log: &Log) -> Collaborators {
        Collaborators::new()
            .with_world(Box::new(Recorder(log.clone())))
            .with_feedback(Box::new(Recorder(log.clone())))
            .with_presenter(Box::new(Recorder(log.clone())))
            .with_store(Box::new(Recorder(log.clone())))
    }

    fn launch() -> LaunchPlan {
        LaunchPlan {
            edge: crate::sim::Edge::Bottom,
            origin: Vec2::ZERO,
            impulse: Vec2::Y,
            torque: glam::Vec3::ZERO,
        }
    }

    #[test]
    fn test_dispatch_routes_in_order() {
        let log: Log = Rc::default();
        let mut collaborators = full(&log);

        collaborators.dispatch(vec![
            SessionEvent::SessionStarted,
            SessionEvent::TargetChanged(ColorIndex(2)),
            SessionEvent::SpawnCube {
                handle: CubeHandle(1),
                color: ColorIndex(2),
                launch: launch(),
            },
            SessionEvent::Feedback {
                kind: FeedbackKind::Correct,
                color: ColorIndex(2),
                position: Vec2::ZERO,
            },
            SessionEvent::PersistBestScore(1),
            SessionEvent::ScoreChanged {
                score: 1,
                best_score: 1,
            },
            SessionEvent::DestroyCube(CubeHandle(1)),
            SessionEvent::MissActivated(0),
            SessionEvent::PauseChanged(true),
            SessionEvent::GameOver(GameOverReason::WrongCube),
            SessionEvent::DestroyAllCubes,
        ]);

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Started,
                Call::Target(ColorIndex(2)),
                Call::Spawn(CubeHandle(1), ColorIndex(2)),
                Call::Play(FeedbackKind::Correct, ColorIndex(2)),
                Call::Persist(1),
                Call::Score(1, 1),
                Call::Destroy(CubeHandle(1)),
                Call::Miss(0),
                Call::Paused(true),
                Call::Over(GameOverReason::WrongCube),
                Call::DestroyAll,
            ]
        );
    }

    #[test]
    fn test_absent_collaborators_are_skipped_individually() {
        let log: Log = Rc::default();
        let mut collaborators =
            Collaborators::new().with_presenter(Box::new(Recorder(log.clone())));

        collaborators.dispatch(vec![
            SessionEvent::SpawnCube {
                handle: CubeHandle(1),
                color: ColorIndex(0),
                launch: launch(),
            },
            SessionEvent::Feedback {
                kind: FeedbackKind::Miss,
                color: ColorIndex(0),
                position: Vec2::ZERO,
            },
            SessionEvent::PersistBestScore(9),
            SessionEvent::MissActivated(1),
        ]);

        assert_eq!(*log.borrow(), vec![Call::Miss(1)]);
    }

    #[test]
    fn test_store_failure_does_not_stop_dispatch() {
        let log: Log = Rc::default();
        let mut collaborators = Collaborators::new()
            .with_store(Box::new(BrokenStore))
            .with_presenter(Box::new(Recorder(log.clone())));

        collaborators.dispatch(vec![
            SessionEvent::PersistBestScore(3),
            SessionEvent::ScoreChanged {
                score: 3,
                best_score: 3,
            },
        ]);

        assert_eq!(*log.borrow(), vec![Call::Score(3, 3)]);
    }

    #[test]
    fn test_run_frame_starts_and_spawns() {
        let log: Log = Rc::default();
        let mut collaborators = full(&log);
        let mut session = GameSession::new(GameConfig::default(), 0, 7).unwrap();
        let mut input = QueuedInput::new();

        session.start();
        run_frame(&mut session, &mut input, &mut collaborators, 0.016);

        let calls = log.borrow();
        assert_eq!(calls[0], Call::Started);
        assert!(matches!(calls[1], Call::Target(_)));
        assert_eq!(calls[2], Call::Score(0, 0));
        assert!(matches!(calls[3], Call::Spawn(CubeHandle(1), _)));
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_pump_input_delivers_pop() {
        let mut session = GameSession::new(GameConfig::default(), 0, 11).unwrap();
        session.start();
        session.tick(0.0);

        let (handle, color) = session
            .events()
            .iter()
            .find_map(|e| match e {
                SessionEvent::SpawnCube { handle, color, .. } => Some((*handle, *color)),
                _ => None,
            })
            .unwrap();
        let was_target = color == session.target();

        let mut input = QueuedInput::new();
        input.push(InputEvent::Popped {
            handle,
            color,
            position: Vec2::ZERO,
        });
        assert_eq!(pump_input(&mut input, &mut session), 1);
        assert_eq!(session.live_cube_count(), 0);
        if was_target {
            assert_eq!(session.state().score(), 1);
        } else {
            assert!(session.outcome().is_terminal());
        }
    }

    #[test]
    fn test_memory_store_receives_new_best() {
        let mut collaborators = Collaborators::new().with_store(Box::new(MemoryStore::new(0)));
        collaborators.dispatch(vec![SessionEvent::PersistBestScore(4)]);
        let store = collaborators.store.as_mut().unwrap();
        assert_eq!(store.load().unwrap(), 4);
    }
}
