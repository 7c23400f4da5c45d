//! Launch planning for spawned cubes
//!
//! Cubes enter from a random screen edge, just outside the visible area, and
//! are tossed upward with a nudge toward the center plus a random spin. The
//! physics layer applies the plan; nothing here simulates motion.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::config::{GameConfig, PlayArea};
use crate::consts::SPAWN_MARGIN;

/// Screen edge a cube enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Unit direction from this edge toward the center
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Top => Vec2::NEG_Y,
            Edge::Bottom => Vec2::Y,
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
        }
    }
}

/// Where and how to launch one cube
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchPlan {
    pub edge: Edge,
    /// Spawn position (world units, z is fixed by the physics layer)
    pub origin: Vec2,
    /// Impulse applied once at spawn
    pub impulse: Vec2,
    /// Angular impulse applied once at spawn
    pub torque: Vec3,
}

/// Plan a launch from a uniformly chosen edge
pub fn plan_launch<R: RandomSource + ?Sized>(
    area: &PlayArea,
    config: &GameConfig,
    rng: &mut R,
) -> LaunchPlan {
    let edge = Edge::ALL[rng.next_index(Edge::ALL.len())];
    let (min, max) = (area.min, area.max);

    let origin = match edge {
        Edge::Top => {
            // Keep the whole cube inside the horizontal span
            let half = config.cube_size / 2.0;
            let (lo, hi) = if max.x - min.x > config.cube_size {
                (min.x + half, max.x - half)
            } else {
                (min.x, max.x)
            };
            Vec2::new(rng.next_range(lo, hi), max.y + SPAWN_MARGIN)
        }
        Edge::Bottom => Vec2::new(rng.next_range(min.x, max.x), min.y - SPAWN_MARGIN),
        Edge::Left => Vec2::new(min.x - SPAWN_MARGIN, rng.next_range(min.y, max.y)),
        Edge::Right => Vec2::new(max.x + SPAWN_MARGIN, rng.next_range(min.y, max.y)),
    };

    let impulse = edge.inward() * config.sideways_force + Vec2::Y * config.toss_force;

    let spin = config.spin_speed;
    let torque = Vec3::new(
        rng.next_range(-spin, spin),
        rng.next_range(-spin, spin),
        rng.next_range(-spin, spin),
    );

    LaunchPlan {
        edge,
        origin,
        impulse,
        torque,
    }
}
