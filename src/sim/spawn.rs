//! Spawn director
//!
//! Time-driven state machine deciding when, where, how many and which enemies
//! and bosses enter the arena.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{boss_scale, difficulty_scale};
use super::enemy::{Enemy, EnemyKind};
use super::registry::{EntityId, EntityRegistry};
use super::state::GameEvent;
use crate::consts::*;
use crate::polar_to_cartesian;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDirector {
    /// Ticks since the last regular spawn
    pub spawn_timer: u32,
    /// Ticks between regular spawns
    pub spawn_rate: u32,
    /// 600-tick window in which the rate last stepped down
    pub rate_step_window: u64,
    /// Ticks since the last boss
    pub boss_timer: u32,
    pub boss_interval: u32,
    /// Scale used by the most recent regular spawn
    pub difficulty_scale: f32,
    pub bosses_defeated: u32,
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self::new()
    }
}

/// Weighted enemy pool for a point in the run.
///
/// Duplicates bias the uniform pick toward kinds unlocked earlier.
pub fn candidate_pool(time_ticks: u64) -> Vec<EnemyKind> {
    use EnemyKind::*;

    let mut pool = vec![Shark, Shark, Piranha];
    if time_ticks > 600 {
        pool.extend([Jellyfish, Piranha]);
    }
    if time_ticks > 1200 {
        pool.extend([Eel, Hammerhead]);
    }
    if time_ticks > 2400 {
        pool.extend([Crab, Octopus]);
    }
    if time_ticks > 600 {
        pool.extend([Jellyfish, Jellyfish]);
    }
    if time_ticks > 1800 {
        pool.extend([Eel, Eel]);
    }
    if time_ticks > 3600 {
        pool.push(Octopus);
    }
    pool
}

/// Enemies per regular spawn
pub fn spawn_count(time_ticks: u64) -> u32 {
    if time_ticks > 2400 {
        3
    } else if time_ticks > 1200 {
        2
    } else {
        1
    }
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self {
            spawn_timer: 0,
            spawn_rate: INITIAL_SPAWN_RATE,
            rate_step_window: 0,
            boss_timer: 0,
            boss_interval: BOSS_INTERVAL,
            difficulty_scale: 1.0,
            bosses_defeated: 0,
        }
    }

    /// Ticks until the next boss
    pub fn boss_countdown(&self) -> u32 {
        self.boss_interval.saturating_sub(self.boss_timer)
    }

    /// Advance both timers and spawn whatever is due this tick
    pub fn update(
        &mut self,
        time_ticks: u64,
        player_pos: Vec2,
        registry: &mut EntityRegistry,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) {
        self.spawn_timer += 1;
        if self.spawn_timer >= self.spawn_rate {
            self.spawn_wave(time_ticks, player_pos, registry, rng, events);
            self.spawn_timer = 0;
            self.step_rate(time_ticks);
        }

        self.boss_timer += 1;
        if self.boss_timer >= self.boss_interval {
            self.spawn_boss(player_pos, registry, rng, events);
            self.boss_timer = 0;
        }
    }

    /// Shrink the spawn interval once per 600-tick window, down to the floor
    fn step_rate(&mut self, time_ticks: u64) {
        let window = time_ticks / SPAWN_RATE_WINDOW;
        if window > self.rate_step_window && self.spawn_rate > MIN_SPAWN_RATE {
            self.spawn_rate = self
                .spawn_rate
                .saturating_sub(SPAWN_RATE_STEP)
                .max(MIN_SPAWN_RATE);
            self.rate_step_window = window;
            log::debug!("Spawn rate now every {} ticks", self.spawn_rate);
        }
    }

    /// Regular spawn: a group of one kind, off-screen around the player
    pub fn spawn_wave(
        &mut self,
        time_ticks: u64,
        player_pos: Vec2,
        registry: &mut EntityRegistry,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> Vec<EntityId> {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let distance = rng.random_range(SPAWN_DISTANCE_MIN..=SPAWN_DISTANCE_MAX) as f32;
        let base = player_pos + polar_to_cartesian(distance, angle);

        self.difficulty_scale = difficulty_scale(time_ticks);

        let pool = candidate_pool(time_ticks);
        let kind = *pool.choose(rng).unwrap_or(&EnemyKind::Shark);
        let elite = time_ticks > 1200 && rng.random_bool(ELITE_CHANCE);

        let count = spawn_count(time_ticks);
        let mut spawned = Vec::with_capacity(count as usize);
        for i in 0..count {
            // Group members after the first are jittered radially, rotated by index
            let pos = if i == 0 {
                base
            } else {
                let spread = rng.random_range(-SPAWN_JITTER..=SPAWN_JITTER);
                base + polar_to_cartesian(spread, angle + i as f32)
            };
            let id = registry.next_entity_id();
            let mut enemy = Enemy::new(id, kind, pos, elite, self.difficulty_scale);
            if kind == EnemyKind::Jellyfish {
                enemy = enemy.with_float_phase(rng.random_range(0.0..std::f32::consts::TAU));
            }
            registry.add_enemy(enemy);
            events.push(GameEvent::EnemySpawned { id, kind, elite });
            spawned.push(id);
        }
        log::debug!(
            "Spawned {} {}{} at t={} (scale {:.1})",
            count,
            if elite { "elite " } else { "" },
            kind.name(),
            time_ticks,
            self.difficulty_scale
        );
        spawned
    }

    /// Boss spawn: alternate kinds, scaled by bosses already defeated
    pub fn spawn_boss(
        &mut self,
        player_pos: Vec2,
        registry: &mut EntityRegistry,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> EntityId {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let pos = player_pos + polar_to_cartesian(BOSS_SPAWN_DISTANCE, angle);

        let kind = EnemyKind::BOSSES[self.bosses_defeated as usize % EnemyKind::BOSSES.len()];
        let scale = boss_scale(self.bosses_defeated);

        let id = registry.next_entity_id();
        registry.add_enemy(Enemy::new(id, kind, pos, false, scale));
        events.push(GameEvent::BossSpawned { id, kind });
        log::info!("Boss spawned: {} (scale {:.1})", kind.name(), scale);
        id
    }
}
