//! Difficulty curve
//!
//! Pure functions from elapsed ticks / boss kills to stat multipliers.
//! Enemy construction runs base stats through [`scale_stats`]; nothing here
//! touches entity state.

use serde::{Deserialize, Serialize};

use crate::consts::{BOSS_SCALE_STEP, DIFFICULTY_STEP, DIFFICULTY_WINDOW};

/// Combat-relevant stats of an enemy (base table row or scaled result)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Collision radius
    pub size: f32,
    /// Units per tick
    pub speed: f32,
    pub hp: f32,
    pub damage: i32,
    pub xp_value: u32,
}

/// Difficulty scale for a point in the run: `1 + floor(t / 1800) * 0.3`
pub fn difficulty_scale(time_ticks: u64) -> f32 {
    1.0 + (time_ticks / DIFFICULTY_WINDOW) as f32 * DIFFICULTY_STEP
}

/// Scale passed to a boss after `bosses_defeated` kills
pub fn boss_scale(bosses_defeated: u32) -> f32 {
    1.0 + bosses_defeated as f32 * BOSS_SCALE_STEP
}

#[inline]
pub fn hp_multiplier(scale: f32) -> f64 {
    2.2 + (f64::from(scale) - 1.0) * 0.7
}

#[inline]
pub fn damage_multiplier(scale: f32) -> f64 {
    0.6 + f64::from(scale) * 0.4
}

/// Speed grows far slower than hp/damage and is capped at 0.5
#[inline]
pub fn speed_multiplier(scale: f32) -> f64 {
    (0.25 + (f64::from(scale) - 1.0) * 0.3).min(0.5)
}

/// Apply difficulty, elite and boss modifiers (in that order) to base stats.
///
/// Integer stats are truncated after every multiplication.
pub fn scale_stats(base: EnemyStats, scale: f32, elite: bool, boss: bool) -> EnemyStats {
    let mut size = f64::from(base.size);
    let mut hp = (f64::from(base.hp) * hp_multiplier(scale)).trunc();
    let mut damage = (f64::from(base.damage) * damage_multiplier(scale)).trunc();
    let mut speed = f64::from(base.speed) * speed_multiplier(scale);
    let mut xp_value = f64::from(base.xp_value);

    if elite {
        size = (size * 1.3).trunc();
        hp = (hp * 2.0).trunc();
        damage = (damage * 1.5).trunc();
        speed *= 1.2;
        xp_value = (xp_value * 3.0).trunc();
    }

    if boss {
        xp_value = (xp_value * f64::from(scale)).trunc();
    }

    EnemyStats {
        size: size as f32,
        speed: speed as f32,
        hp: hp as f32,
        damage: damage as i32,
        xp_value: xp_value as u32,
    }
}
