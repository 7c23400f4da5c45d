//! Session state and core gameplay types
//!
//! Score, best score, misses and the game-over outcome live here. Every
//! transition is guarded: events that arrive in the wrong state are no-ops.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::best_score::BestScore;

/// One of the N cube colors, in `[0, color_count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColorIndex(pub u8);

impl ColorIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ColorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color#{}", self.0)
    }
}

/// Opaque id for a spawned cube (allocated by the session, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeHandle(pub u64);

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Popped a cube that was not the target color
    WrongCube,
    /// Every miss marker was activated
    MissesExhausted,
}

/// Result of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Playing,
    WrongCube,
    MissesExhausted,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Playing
    }

    pub fn reason(self) -> Option<GameOverReason> {
        match self {
            Outcome::Playing => None,
            Outcome::WrongCube => Some(GameOverReason::WrongCube),
            Outcome::MissesExhausted => Some(GameOverReason::MissesExhausted),
        }
    }
}

/// Accepted correct pop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub score: u64,
    pub best_score: u64,
    /// Best score was raised by this pop and must be persisted
    pub new_best: bool,
}

/// What a miss did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissOutcome {
    /// Outcome already terminal
    Ignored,
    /// Cube was not the target color, no marker lost
    NotTarget,
    /// Marker `index` activated, run continues
    Marked { index: u32 },
    /// Marker `index` activated and it was the last one
    Exhausted { index: u32 },
}

/// Score, misses and outcome for one session (reset, never recreated, on restart)
#[derive(Debug, Clone)]
pub struct SessionState {
    score: u64,
    best: BestScore,
    misses: u32,
    max_misses: u32,
    paused: bool,
    outcome: Outcome,
    target: ColorIndex,
}

impl SessionState {
    pub fn new(best_score: u64, max_misses: u32) -> Self {
        Self {
            score: 0,
            best: BestScore::new(best_score),
            misses: 0,
            max_misses: max_misses.max(1),
            paused: false,
            outcome: Outcome::Playing,
            target: ColorIndex(0),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best.value()
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn max_misses(&self) -> u32 {
        self.max_misses
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn target(&self) -> ColorIndex {
        self.target
    }

    pub fn set_target(&mut self, target: ColorIndex) {
        self.target = target;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Target-colored cube popped. Returns `None` if the pop is not acceptable.
    pub fn on_correct_pop(&mut self, color: ColorIndex) -> Option<ScoreUpdate> {
        if self.outcome.is_terminal() || color != self.target {
            log::debug!("Ignoring correct pop of {} (outcome {:?})", color, self.outcome);
            return None;
        }

        self.score += 1;
        let new_best = self.best.record(self.score).is_some();

        Some(ScoreUpdate {
            score: self.score,
            best_score: self.best.value(),
            new_best,
        })
    }

    /// Non-target cube popped. Returns true if this ended the run.
    pub fn on_wrong_pop(&mut self, color: ColorIndex) -> bool {
        if self.outcome.is_terminal() || color == self.target {
            log::debug!("Ignoring wrong pop of {} (outcome {:?})", color, self.outcome);
            return false;
        }
        self.outcome = Outcome::WrongCube;
        true
    }

    /// Cube left the play area unpopped
    pub fn on_miss(&mut self, color: ColorIndex) -> MissOutcome {
        if self.outcome.is_terminal() {
            return MissOutcome::Ignored;
        }
        if color != self.target {
            return MissOutcome::NotTarget;
        }

        let index = self.misses;
        self.misses += 1;
        if self.misses >= self.max_misses {
            self.outcome = Outcome::MissesExhausted;
            MissOutcome::Exhausted { index }
        } else {
            MissOutcome::Marked { index }
        }
    }

    /// Back to a fresh run. Best score is kept.
    pub fn reset(&mut self) {
        self.score = 0;
        self.misses = 0;
        self.paused = false;
        self.outcome = Outcome::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state_with_target(target: u8) -> SessionState {
        let mut state = SessionState::new(0, 3);
        state.set_target(ColorIndex(target));
        state
    }

    #[test]
    fn test_correct_pop_scores_and_raises_best() {
        let mut state = state_with_target(1);
        let update = state.on_correct_pop(ColorIndex(1)).unwrap();
        assert_eq!(update.score, 1);
        assert_eq!(update.best_score, 1);
        assert!(update.new_best);
    }

    #[test]
    fn test_correct_pop_below_best_does_not_persist() {
        let mut state = SessionState::new(5, 3);
        let update = state.on_correct_pop(ColorIndex(0)).unwrap();
        assert_eq!(update.score, 1);
        assert_eq!(update.best_score, 5);
        assert!(!update.new_best);
    }

    #[test]
    fn test_correct_pop_wrong_color_is_noop() {
        let mut state = state_with_target(1);
        assert!(state.on_correct_pop(ColorIndex(2)).is_none());
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_wrong_pop_ends_run_irreversibly() {
        let mut state = state_with_target(0);
        state.on_correct_pop(ColorIndex(0));
        state.on_miss(ColorIndex(0));
        assert!(state.on_wrong_pop(ColorIndex(2)));
        assert_eq!(state.outcome(), Outcome::WrongCube);

        // Late events are ignored
        assert!(state.on_correct_pop(ColorIndex(0)).is_none());
        assert!(!state.on_wrong_pop(ColorIndex(1)));
        assert_eq!(state.on_miss(ColorIndex(0)), MissOutcome::Ignored);
        assert_eq!(state.score(), 1);
        assert_eq!(state.misses(), 1);
        assert_eq!(state.outcome(), Outcome::WrongCube);
    }

    #[test]
    fn test_wrong_pop_of_target_is_noop() {
        let mut state = state_with_target(0);
        assert!(!state.on_wrong_pop(ColorIndex(0)));
        assert_eq!(state.outcome(), Outcome::Playing);
    }

    #[test]
    fn test_non_target_miss_costs_nothing() {
        let mut state = state_with_target(0);
        assert_eq!(state.on_miss(ColorIndex(1)), MissOutcome::NotTarget);
        assert_eq!(state.misses(), 0);
    }

    #[test]
    fn test_misses_exhaust_exactly_at_max() {
        let mut state = state_with_target(2);
        assert_eq!(state.on_miss(ColorIndex(2)), MissOutcome::Marked { index: 0 });
        assert_eq!(state.on_miss(ColorIndex(2)), MissOutcome::Marked { index: 1 });
        assert_eq!(state.outcome(), Outcome::Playing);
        assert_eq!(state.on_miss(ColorIndex(2)), MissOutcome::Exhausted { index: 2 });
        assert_eq!(state.outcome(), Outcome::MissesExhausted);
        assert_eq!(state.on_miss(ColorIndex(2)), MissOutcome::Ignored);
        assert_eq!(state.misses(), 3);
    }

    #[test]
    fn test_reset_keeps_best() {
        let mut state = state_with_target(0);
        for _ in 0..4 {
            state.on_correct_pop(ColorIndex(0));
        }
        state.on_wrong_pop(ColorIndex(1));
        state.reset();
        assert_eq!(state.score(), 0);
        assert_eq!(state.misses(), 0);
        assert_eq!(state.outcome(), Outcome::Playing);
        assert_eq!(state.best_score(), 4);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Correct,
        Wrong,
        MissTarget,
        MissOther,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => Just(Op::Correct),
            1 => Just(Op::Wrong),
            2 => Just(Op::MissTarget),
            2 => Just(Op::MissOther),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_and_misses_accounting(
            initial_best in 0u64..20,
            ops in proptest::collection::vec(op_strategy(), 0..60),
        ) {
            let mut state = SessionState::new(initial_best, 3);
            let mut persisted = 0u32;
            let mut best_raises = 0u32;
            let mut prev_best = initial_best;

            for op in ops {
                let before = state.clone();
                match op {
                    Op::Correct => {
                        if let Some(update) = state.on_correct_pop(ColorIndex(0)) {
                            prop_assert_eq!(update.score, before.score() + 1);
                            if update.new_best {
                                persisted += 1;
                            }
                        } else {
                            prop_assert!(before.outcome().is_terminal());
                            prop_assert_eq!(state.score(), before.score());
                        }
                    }
                    Op::Wrong => {
                        state.on_wrong_pop(ColorIndex(1));
                        prop_assert_eq!(state.outcome().is_terminal(), true);
                        if !before.outcome().is_terminal() {
                            prop_assert_eq!(state.outcome(), Outcome::WrongCube);
                        }
                    }
                    Op::MissTarget => {
                        state.on_miss(ColorIndex(0));
                        if before.outcome().is_terminal() {
                            prop_assert_eq!(state.misses(), before.misses());
                        } else {
                            prop_assert_eq!(state.misses(), before.misses() + 1);
                            prop_assert_eq!(
                                state.outcome() == Outcome::MissesExhausted,
                                state.misses() == state.max_misses()
                            );
                        }
                    }
                    Op::MissOther => {
                        state.on_miss(ColorIndex(2));
                        prop_assert_eq!(state.misses(), before.misses());
                    }
                }

                prop_assert_eq!(state.best_score(), prev_best.max(state.score()));
                if state.best_score() > prev_best {
                    best_raises += 1;
                }
                prev_best = state.best_score();
            }

            prop_assert_eq!(persisted, best_raises);
        }
    }
}
