//! Shark Survivors - A top-down underwater arena survival simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world streaming, spawning, combat, progression)
//! - `settings`: Run seed and debug-overlay multipliers
//! - `error`: Errors surfaced to embedders (renderer/input shells)

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::{DebugTuning, Settings};

use glam::Vec2;

/// Game configuration constants (all times in ticks, all lengths in world units)
pub mod consts {
    /// Nominal tick rate the tick-based thresholds were tuned for
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 25.0;
    pub const PLAYER_SPEED: f32 = 3.5;
    pub const PLAYER_MAX_HP: i32 = 100;
    pub const PLAYER_XP_TO_FIRST_LEVEL: u32 = 10;
    /// Diagonal input is scaled by this factor
    pub const DIAGONAL_FACTOR: f32 = 0.707;

    /// World streaming
    pub const CHUNK_SIZE: i32 = 500;
    /// Chunks generated on each side of the player's chunk (7x7 block)
    pub const CHUNK_VIEW_RADIUS: i32 = 3;
    /// Chunks on each side of the origin that stay empty (3x3 block)
    pub const SAFE_ZONE_RADIUS: i32 = 1;
    pub const OBSTACLE_HORIZON: f32 = 2000.0;
    pub const CHEST_CHANCE: f64 = 0.25;
    pub const SHRINE_CHANCE: f64 = 0.15;
    pub const LOOT_PLACEMENT_ATTEMPTS: u32 = 10;
    /// Loot anchors are kept this far from the chunk border
    pub const LOOT_MARGIN: i32 = 50;

    /// Culling horizons (Chebyshev distance from the player)
    pub const ENEMY_HORIZON: f32 = 2000.0;
    pub const GEM_HORIZON: f32 = 2000.0;
    pub const PROJECTILE_HORIZON: f32 = 1500.0;

    /// Spawn director
    pub const INITIAL_SPAWN_RATE: u32 = 120;
    pub const MIN_SPAWN_RATE: u32 = 30;
    pub const SPAWN_RATE_STEP: u32 = 5;
    pub const SPAWN_RATE_WINDOW: u64 = 600;
    pub const BOSS_INTERVAL: u32 = 3600;
    pub const SPAWN_DISTANCE_MIN: i32 = 700;
    pub const SPAWN_DISTANCE_MAX: i32 = 900;
    pub const BOSS_SPAWN_DISTANCE: f32 = 1000.0;
    pub const SPAWN_JITTER: f32 = 50.0;
    pub const ELITE_CHANCE: f64 = 0.1;

    /// Difficulty curve
    pub const DIFFICULTY_WINDOW: u64 = 1800;
    pub const DIFFICULTY_STEP: f32 = 0.3;
    pub const BOSS_SCALE_STEP: f32 = 0.5;

    /// Combat
    pub const PROJECTILE_SIZE: f32 = 8.0;
    pub const NET_SPREAD: f32 = 0.3;
    /// Distance of the net aim points from the target
    pub const NET_AIM_OFFSET: f32 = 100.0;
    pub const BOSS_GEM_COUNT: u32 = 10;
    pub const BOSS_GEM_SCATTER: i32 = 50;

    /// Pickups
    pub const GEM_SIZE: f32 = 8.0;
    pub const GEM_MAGNET_RADIUS: f32 = 150.0;
    pub const GEM_MAGNET_SPEED: f32 = 10.0;
    pub const CHEST_SIZE: f32 = 22.0;
    pub const CHEST_XP: u32 = 50;
    pub const SHRINE_SIZE: f32 = 28.0;

    /// Level-up options offered per level
    pub const LEVEL_UP_CHOICES: usize = 3;
}

/// Chebyshev (max-axis) distance between two points
#[inline]
pub fn chebyshev_distance(a: Vec2, b: Vec2) -> f32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit direction from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chebyshev_distance() {
        let a = Vec2::new(0.0, 0.0);
        assert_eq!(chebyshev_distance(a, Vec2::new(3.0, -7.0)), 7.0);
        assert_eq!(chebyshev_distance(a, Vec2::new(-9.0, 2.0)), 9.0);
    }

    #[test]
    fn test_direction_to_zero_distance() {
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(direction_to(p, p), Vec2::ZERO);
        let d = direction_to(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((d.x - 1.0).abs() < 1e-6);
    }
}
