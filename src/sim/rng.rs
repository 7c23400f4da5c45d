//! Random draws for the gameplay policies
//!
//! Policies never touch a concrete RNG. They draw through [`RandomSource`] so
//! tests can replay exact sequences with [`ScriptedRandom`] while the game
//! runs on a seeded PCG stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform integer/float draws
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`. `upper` must be at least 1.
    fn next_index(&mut self, upper: usize) -> usize;

    /// Uniform float in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Uniform float in `[low, high)`
    fn next_range(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_unit()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }
}

/// Seeded PCG stream (deterministic per seed)
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent stream (used for launch jitter)
    pub fn fork(&mut self) -> Self {
        let seed = self.rng.random::<u64>();
        Self::new(seed)
    }
}

impl RandomSource for SeededRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper.max(1))
    }

    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays fixed draws, cycling when a script runs out.
///
/// Index draws are reduced modulo `upper` so a script stays in range for any
/// color count. An empty index script yields 0, an empty unit script yields 0.0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    indices: Vec<usize>,
    units: Vec<f32>,
    index_pos: usize,
    unit_pos: usize,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices = indices.into_iter().collect();
        self
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = f32>) -> Self {
        self.units = units.into_iter().collect();
        self
    }

    /// Number of index draws consumed so far
    pub fn index_draws(&self) -> usize {
        self.index_pos
    }

    /// Number of unit draws consumed so far
    pub fn unit_draws(&self) -> usize {
        self.unit_pos
    }
}

impl RandomSource for ScriptedRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        let value = if self.indices.is_empty() {
            0
        } else {
            self.indices[self.index_pos % self.indices.len()]
        };
        self.index_pos += 1;
        value % upper.max(1)
    }

    fn next_unit(&mut self) -> f32 {
        let value = if self.units.is_empty() {
            0.0
        } else {
            self.units[self.unit_pos % self.units.len()]
        };
        self.unit_pos += 1;
        value
    }
}
