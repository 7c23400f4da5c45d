//! Target color selection
//!
//! Repeats are allowed but discouraged: a repeat is always rejected once the
//! cap is reached, and otherwise rejected on a coin flip so the target does
//! not just toggle between two colors. After [`MAX_TARGET_ATTEMPTS`] rejected
//! draws the last draw is kept anyway, so the cap is approximate under a
//! hostile RNG.

use super::rng::RandomSource;
use super::state::ColorIndex;
use crate::consts::{MAX_TARGET_ATTEMPTS, REPEAT_REJECT_CHANCE};

/// What the target picker remembers between picks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetHistory {
    /// Target currently shown (`None` before the first pick)
    pub current: Option<ColorIndex>,
    /// Target shown before `current`
    pub previous: Option<ColorIndex>,
    /// How many picks in a row chose `current`
    pub repeat_count: u32,
}

/// Target tuning, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRules {
    pub color_count: u8,
    pub max_target_repeats: u32,
}

/// Pick the next target color.
///
/// Returns the color and the updated history; the input history is untouched.
pub fn next_target<R: RandomSource + ?Sized>(
    history: &TargetHistory,
    rules: &TargetRules,
    rng: &mut R,
) -> (ColorIndex, TargetHistory) {
    let count = rules.color_count.max(1) as usize;
    let mut candidate = history.current.unwrap_or(ColorIndex(0));
    let mut accepted = false;

    for _ in 0..MAX_TARGET_ATTEMPTS {
        candidate = ColorIndex(rng.next_index(count) as u8);

        if history.current == Some(candidate) {
            if history.repeat_count >= rules.max_target_repeats {
                continue;
            }
            if rng.chance(REPEAT_REJECT_CHANCE) {
                continue;
            }
        }

        accepted = true;
        break;
    }

    if !accepted {
        log::warn!(
            "Target picker exhausted {} attempts, keeping {}",
            MAX_TARGET_ATTEMPTS,
            candidate
        );
    }

    let repeat_count = if history.current == Some(candidate) {
        history.repeat_count + 1
    } else {
        1
    };

    log::debug!("New target {} (repeat {})", candidate, repeat_count);

    (
        candidate,
        TargetHistory {
            current: Some(candidate),
            previous: history.current,
            repeat_count,
        },
    )
}
