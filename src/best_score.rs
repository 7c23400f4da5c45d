//! Best score tracking
//!
//! One non-negative integer that only ever goes up. Persisted as a small
//! JSON record by whichever [`crate::platform::storage::ScoreStore`] the host uses.

use serde::{Deserialize, Serialize};

/// Best score seen so far (monotonically non-decreasing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Check if a score would beat the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.value
    }

    /// Record a score. Returns the new best if it was raised.
    pub fn record(&mut self, score: u64) -> Option<u64> {
        if !self.qualifies(score) {
            return None;
        }
        self.value = score;
        Some(score)
    }
}

/// On-disk / LocalStorage shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestScoreRecord {
    pub best_score: u64,
}

impl BestScoreRecord {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<BestScore> for BestScoreRecord {
    fn from(best: BestScore) -> Self {
        Self {
            best_score: best.value(),
        }
    }
}
