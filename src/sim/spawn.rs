//! Spawn color selection
//!
//! Two guarantees shape the otherwise uniform draw:
//! - No color spawns more than [`MAX_SAME_COLOR_STREAK`] times in a row
//! - The target color cannot go missing for long (drought guarantee)

use super::rng::RandomSource;
use super::state::ColorIndex;
use crate::consts::{DROUGHT_FORCE_CHANCE, MAX_SAME_COLOR_STREAK, MAX_STREAK_REDRAWS};

/// What the spawner remembers between spawns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnHistory {
    /// Color of the previous spawn (`None` before the first spawn)
    pub last: Option<ColorIndex>,
    /// How many spawns in a row had `last`'s color
    pub same_color_count: u32,
    /// Consecutive spawns that were not the target color
    pub non_target_streak: u32,
}

/// Spawn tuning, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRules {
    pub color_count: u8,
    /// 0 disables the drought guarantee
    pub max_non_target_spawns: u32,
}

/// Pick the next cube color.
///
/// Returns the color and the updated history; the input history is untouched.
pub fn next_spawn_color<R: RandomSource + ?Sized>(
    history: &SpawnHistory,
    target: ColorIndex,
    rules: &SpawnRules,
    rng: &mut R,
) -> (ColorIndex, SpawnHistory) {
    let count = rules.color_count.max(1) as usize;
    let draw = |rng: &mut R| ColorIndex(rng.next_index(count) as u8);

    // A third consecutive spawn of `color` is not allowed
    let streak_blocks = |color: ColorIndex| {
        count >= 2
            && history.last == Some(color)
            && history.same_color_count >= MAX_SAME_COLOR_STREAK
    };

    let mut candidate = draw(rng);
    if streak_blocks(candidate) {
        let mut attempts = 1;
        while streak_blocks(candidate) {
            if attempts >= MAX_STREAK_REDRAWS {
                candidate = ColorIndex(((candidate.index() + 1) % count) as u8);
                log::warn!("Streak redraw cap hit, stepping to {}", candidate);
                break;
            }
            candidate = draw(rng);
            attempts += 1;
        }
    }

    let limit = rules.max_non_target_spawns;
    let mut non_target_streak = history.non_target_streak;
    if limit > 0 && candidate != target {
        non_target_streak = if history.last == Some(target) {
            1
        } else {
            non_target_streak + 1
        };

        let force = if non_target_streak == limit {
            rng.chance(DROUGHT_FORCE_CHANCE)
        } else {
            non_target_streak > limit
        };

        if force {
            if streak_blocks(target) {
                log::debug!("Drought force deferred, {} already spawned twice", target);
            } else {
                candidate = target;
            }
        }
    }
    if candidate == target {
        non_target_streak = 0;
    }

    let same_color_count = if history.last == Some(candidate) {
        history.same_color_count + 1
    } else {
        1
    };

    log::debug!(
        "Spawn {} (target {}, same {}, drought {})",
        candidate,
        target,
        same_color_count,
        non_target_streak
    );

    (
        candidate,
        SpawnHistory {
            last: Some(candidate),
            same_color_count,
            non_target_streak,
        },
    )
}
