//! Progression system
//!
//! XP accrual, level-up option rolls, and the effects of level-up choices,
//! chests and shrines.
//!
//! A single XP gain performs at most one level-up: any surplus beyond the
//! next threshold stays in `xp` and is re-checked on the following gain.

use rand::Rng;
use rand::seq::index;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Player;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::LEVEL_UP_CHOICES;

const SWIM_SPEED_BONUS: f32 = 0.5;
const MAX_HP_BONUS: i32 = 30;
const HEAL_AMOUNT: i32 = 50;

/// One entry of the level-up offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpOption {
    NewWeapon(WeaponKind),
    UpgradeWeapon { kind: WeaponKind, next_level: u32 },
    /// Swim speed +0.5
    SwimSpeed,
    /// Max HP +30 and heal to full
    MaxHp,
    /// Heal 50, capped at max
    Heal,
}

impl LevelUpOption {
    pub fn label(&self) -> String {
        match self {
            LevelUpOption::NewWeapon(kind) => format!("New Weapon: {}", kind.name()),
            LevelUpOption::UpgradeWeapon { kind, next_level } => {
                format!("Upgrade {} (Lv{})", kind.name(), next_level)
            }
            LevelUpOption::SwimSpeed => "Swim Speed +0.5".to_string(),
            LevelUpOption::MaxHp => "Max HP +30".to_string(),
            LevelUpOption::Heal => "Heal 50 HP".to_string(),
        }
    }

    pub fn apply(&self, player: &mut Player) {
        match *self {
            LevelUpOption::NewWeapon(kind) | LevelUpOption::UpgradeWeapon { kind, .. } => {
                player.add_weapon(kind);
            }
            LevelUpOption::SwimSpeed => player.speed += SWIM_SPEED_BONUS,
            LevelUpOption::MaxHp => {
                player.max_hp += MAX_HP_BONUS;
                player.hp = player.max_hp;
            }
            LevelUpOption::Heal => player.heal(HEAL_AMOUNT),
        }
    }
}

/// Shrine buffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShrineBuff {
    /// All weapon damage x1.3
    Damage,
    /// Swim speed +1
    Speed,
    /// All weapon cooldowns x0.75 (floor 8)
    Cooldown,
    /// Heal to full
    Heal,
}

impl ShrineBuff {
    pub const ALL: [ShrineBuff; 4] = [
        ShrineBuff::Damage,
        ShrineBuff::Speed,
        ShrineBuff::Cooldown,
        ShrineBuff::Heal,
    ];

    pub fn roll(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn apply(self, player: &mut Player) {
        match self {
            ShrineBuff::Damage => {
                for weapon in &mut player.weapons {
                    weapon.damage = (f64::from(weapon.damage) * 1.3) as u32;
                }
            }
            ShrineBuff::Speed => player.speed += 1.0,
            ShrineBuff::Cooldown => {
                for weapon in &mut player.weapons {
                    weapon.cooldown = ((f64::from(weapon.cooldown) * 0.75) as u32).max(8);
                }
            }
            ShrineBuff::Heal => player.hp = player.max_hp,
        }
    }
}

impl Player {
    /// Add XP; returns true if this gain crossed the level threshold.
    ///
    /// At most one level is gained per call.
    pub fn gain_xp(&mut self, amount: u32) -> bool {
        self.xp += amount;
        if self.xp < self.xp_to_next {
            return false;
        }
        self.xp -= self.xp_to_next;
        self.level += 1;
        self.xp_to_next = ((f64::from(self.xp_to_next) * 1.5) as u32).max(1);
        true
    }

    /// Acquire `kind`, or upgrade it in place if already owned
    pub fn add_weapon(&mut self, kind: WeaponKind) {
        match self.weapons.iter_mut().find(|w| w.kind == kind) {
            Some(weapon) => weapon.upgrade(),
            None => self.weapons.push(Weapon::new(kind)),
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

/// Every option the player could be offered right now
pub fn option_pool(player: &Player) -> Vec<LevelUpOption> {
    let mut pool: Vec<LevelUpOption> = WeaponKind::ALL
        .iter()
        .map(|&kind| match player.weapon(kind) {
            Some(weapon) => LevelUpOption::UpgradeWeapon {
                kind,
                next_level: weapon.level + 1,
            },
            None => LevelUpOption::NewWeapon(kind),
        })
        .collect();
    pool.extend([
        LevelUpOption::SwimSpeed,
        LevelUpOption::MaxHp,
        LevelUpOption::Heal,
    ]);
    pool
}

/// Sample the level-up offer without replacement
pub fn roll_options(player: &Player, rng: &mut Pcg32) -> Vec<LevelUpOption> {
    let pool = option_pool(player);
    let amount = LEVEL_UP_CHOICES.min(pool.len());
    index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool[i])
        .collect()
}
