//! Enemy kinds, their base stat table, and per-tick steering

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::{EnemyStats, scale_stats};
use super::registry::EntityId;

/// Eels burst toward the player inside this range
const EEL_BURST_RANGE: f32 = 300.0;
const EEL_BURST_FACTOR: f32 = 1.5;
/// Jellyfish float phase advance per tick
const JELLY_FLOAT_RATE: f32 = 0.05;
const JELLY_DRIFT: f32 = 0.5;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    Shark,
    Jellyfish,
    Eel,
    Octopus,
    Piranha,
    Hammerhead,
    Crab,
    Megalodon,
    Kraken,
}

impl EnemyKind {
    /// Boss kinds in spawn rotation order
    pub const BOSSES: [EnemyKind; 2] = [EnemyKind::Megalodon, EnemyKind::Kraken];

    /// Base stats before difficulty scaling
    pub const fn base_stats(self) -> EnemyStats {
        let (size, speed, hp, damage, xp_value) = match self {
            EnemyKind::Shark => (20.0, 2.0, 30.0, 10, 5),
            EnemyKind::Jellyfish => (18.0, 1.5, 20.0, 15, 8),
            EnemyKind::Eel => (15.0, 3.0, 25.0, 12, 7),
            EnemyKind::Octopus => (25.0, 1.0, 60.0, 20, 15),
            EnemyKind::Piranha => (12.0, 4.0, 18.0, 6, 6),
            EnemyKind::Hammerhead => (28.0, 2.2, 90.0, 12, 20),
            EnemyKind::Crab => (26.0, 1.2, 140.0, 10, 25),
            EnemyKind::Megalodon => (50.0, 2.5, 500.0, 40, 100),
            EnemyKind::Kraken => (60.0, 0.8, 800.0, 50, 150),
        };
        EnemyStats {
            size,
            speed,
            hp,
            damage,
            xp_value,
        }
    }

    /// Boss kinds are always boss-flagged
    pub const fn is_boss(self) -> bool {
        matches!(self, EnemyKind::Megalodon | EnemyKind::Kraken)
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Shark => "Shark",
            EnemyKind::Jellyfish => "Jellyfish",
            EnemyKind::Eel => "Eel",
            EnemyKind::Octopus => "Octopus",
            EnemyKind::Piranha => "Piranha",
            EnemyKind::Hammerhead => "Hammerhead",
            EnemyKind::Crab => "Crab",
            EnemyKind::Megalodon => "Megalodon",
            EnemyKind::Kraken => "Kraken",
        }
    }
}

/// A live enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Facing angle toward the player (radians)
    pub angle: f32,
    pub size: f32,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub damage: i32,
    pub xp_value: u32,
    pub elite: bool,
    pub boss: bool,
    /// Jellyfish drift phase (unused by other kinds)
    pub float_phase: f32,
}

impl Enemy {
    /// Build an enemy with stats scaled for `scale` (difficulty or boss scale)
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, elite: bool, scale: f32) -> Self {
        let boss = kind.is_boss();
        let stats = scale_stats(kind.base_stats(), scale, elite, boss);
        Self {
            id,
            kind,
            pos,
            angle: 0.0,
            size: stats.size,
            speed: stats.speed,
            hp: stats.hp,
            max_hp: stats.hp,
            damage: stats.damage,
            xp_value: stats.xp_value,
            elite,
            boss,
            float_phase: 0.0,
        }
    }

    pub fn with_float_phase(mut self, phase: f32) -> Self {
        self.float_phase = phase;
        self
    }

    /// Steer straight at the player. Enemies ignore obstacles.
    pub fn advance(&mut self, player_pos: Vec2) {
        let drift = if self.kind == EnemyKind::Jellyfish {
            self.float_phase += JELLY_FLOAT_RATE;
            Vec2::new(
                self.float_phase.cos() * JELLY_DRIFT,
                (self.float_phase * 0.7).sin() * JELLY_DRIFT,
            )
        } else {
            Vec2::ZERO
        };

        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        if dist <= 0.0 {
            return;
        }

        self.angle = to_player.y.atan2(to_player.x);
        let mut speed = self.speed;
        if self.kind == EnemyKind::Eel && dist < EEL_BURST_RANGE {
            speed *= EEL_BURST_FACTOR;
        }
        self.pos += to_player / dist * speed + drift;
    }

    /// Apply damage, returns true if this killed the enemy
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.hp -= amount;
        self.hp <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boss_kinds_flagged() {
        let boss = Enemy::new(1, EnemyKind::Kraken, Vec2::ZERO, false, 1.0);
        assert!(boss.boss);
        let shark = Enemy::new(2, EnemyKind::Shark, Vec2::ZERO, false, 1.0);
        assert!(!shark.boss);
        assert!(EnemyKind::BOSSES.iter().all(|k| k.is_boss()));
    }

    #[test]
    fn test_enemy_steers_toward_player() {
        let mut shark = Enemy::new(1, EnemyKind::Shark, Vec2::new(100.0, 0.0), false, 1.0);
        shark.advance(Vec2::ZERO);
        assert!((shark.pos.x - (100.0 - shark.speed)).abs() < 1e-4);
        assert!(shark.pos.y.abs() < 1e-6);
        assert!((shark.angle - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_enemy_on_player_does_not_move() {
        let mut shark = Enemy::new(1, EnemyKind::Shark, Vec2::ZERO, false, 1.0);
        shark.advance(Vec2::ZERO);
        assert_eq!(shark.pos, Vec2::ZERO);
    }

    #[test]
    fn test_eel_bursts_when_close() {
        let mut far = Enemy::new(1, EnemyKind::Eel, Vec2::new(500.0, 0.0), false, 1.0);
        let mut near = Enemy::new(2, EnemyKind::Eel, Vec2::new(200.0, 0.0), false, 1.0);
        far.advance(Vec2::ZERO);
        near.advance(Vec2::ZERO);
        let far_step = 500.0 - far.pos.x;
        let near_step = 200.0 - near.pos.x;
        assert!((near_step - far_step * 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_jellyfish_drifts() {
        let mut jelly = Enemy::new(1, EnemyKind::Jellyfish, Vec2::new(0.0, 300.0), false, 1.0);
        jelly.advance(Vec2::ZERO);
        // straight-line seek would keep x at 0
        assert!(jelly.pos.x.abs() > 0.1);
        assert!((jelly.float_phase - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_take_damage() {
        let mut shark = Enemy::new(1, EnemyKind::Shark, Vec2::ZERO, false, 1.0);
        assert!(!shark.take_damage(10.0));
        assert!(shark.take_damage(shark.hp));
        assert!(shark.hp <= 0.0);
    }
}
