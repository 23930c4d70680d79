//! Weapons and the projectiles they fire

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::registry::EntityId;
use crate::consts::PROJECTILE_SIZE;
use crate::direction_to;

/// Minimum cooldown reachable through upgrades
pub const MIN_UPGRADE_COOLDOWN: u32 = 10;

/// Weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    Harpoon,
    Trident,
    Net,
    Torpedo,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Harpoon,
        WeaponKind::Trident,
        WeaponKind::Net,
        WeaponKind::Torpedo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Harpoon => "Harpoon",
            WeaponKind::Trident => "Trident",
            WeaponKind::Net => "Net",
            WeaponKind::Torpedo => "Torpedo",
        }
    }
}

/// An owned weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub level: u32,
    pub damage: u32,
    /// Ticks between shots
    pub cooldown: u32,
    pub projectile_speed: f32,
    pub pierce: u32,
    /// Area-effect hit radius (net only)
    pub aoe_radius: Option<f32>,
    /// Torpedo marker; no extra behavior yet
    pub explosive: bool,
}

impl Weapon {
    /// Level 1 weapon with base stats for `kind`
    pub fn new(kind: WeaponKind) -> Self {
        let (damage, cooldown, projectile_speed, pierce) = match kind {
            WeaponKind::Harpoon => (10, 60, 10.0, 1),
            WeaponKind::Trident => (10, 200, 5.0, 3),
            WeaponKind::Net => (5, 250, 2.0, 1),
            WeaponKind::Torpedo => (5, 120, 12.0, 1),
        };
        Self {
            kind,
            level: 1,
            damage,
            cooldown,
            projectile_speed,
            pierce,
            aoe_radius: (kind == WeaponKind::Net).then_some(80.0),
            explosive: kind == WeaponKind::Torpedo,
        }
    }

    /// Level up: damage x1.2, cooldown -10% (floor 10 ticks)
    pub fn upgrade(&mut self) {
        self.level += 1;
        self.damage = (f64::from(self.damage) * 1.2) as u32;
        self.cooldown = ((f64::from(self.cooldown) * 0.9) as u32).max(MIN_UPGRADE_COOLDOWN);
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub weapon: WeaponKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading (radians), for rendering
    pub angle: f32,
    pub size: f32,
    pub damage: f32,
    /// Distinct enemies this projectile may still damage
    pub pierce: u32,
    pub aoe_radius: Option<f32>,
    /// Enemies already damaged by this projectile
    pub hit_set: BTreeSet<EntityId>,
}

impl Projectile {
    /// Fire from `origin` toward `aim`; a zero-length aim leaves it stationary
    pub fn new(id: EntityId, origin: Vec2, aim: Vec2, weapon: &Weapon, damage_factor: f32) -> Self {
        let dir = direction_to(origin, aim);
        let angle = if dir == Vec2::ZERO { 0.0 } else { dir.y.atan2(dir.x) };
        let vel = dir * weapon.projectile_speed;
        Self {
            id,
            weapon: weapon.kind,
            pos: origin,
            vel,
            angle,
            size: PROJECTILE_SIZE,
            damage: weapon.damage as f32 * damage_factor,
            pierce: weapon.pierce,
            aoe_radius: weapon.aoe_radius,
            hit_set: BTreeSet::new(),
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Hit radius against an enemy of `enemy_size`
    pub fn hit_radius(&self, enemy_size: f32) -> f32 {
        self.aoe_radius.unwrap_or(enemy_size + self.size)
    }

    /// Register a hit on `enemy`. Returns false (and consumes nothing) if this
    /// projectile already damaged that enemy or has no pierce left.
    pub fn register_hit(&mut self, enemy: EntityId) -> bool {
        if self.is_spent() || !self.hit_set.insert(enemy) {
            return false;
        }
        self.pierce -= 1;
        true
    }

    pub fn is_spent(&self) -> bool {
        self.pierce == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_table() {
        let net = Weapon::new(WeaponKind::Net);
        assert_eq!(net.aoe_radius, Some(80.0));
        assert_eq!(net.cooldown, 250);
        let trident = Weapon::new(WeaponKind::Trident);
        assert_eq!(trident.pierce, 3);
        assert!(Weapon::new(WeaponKind::Torpedo).explosive);
        assert_eq!(Weapon::new(WeaponKind::Harpoon).aoe_radius, None);
    }

    #[test]
    fn test_upgrade() {
        let mut harpoon = Weapon::new(WeaponKind::Harpoon);
        harpoon.upgrade();
        assert_eq!(harpoon.level, 2);
        assert_eq!(harpoon.damage, 12);
        assert_eq!(harpoon.cooldown, 54);
    }

    #[test]
    fn test_upgrade_cooldown_floor() {
        let mut harpoon = Weapon::new(WeaponKind::Harpoon);
        for _ in 0..100 {
            harpoon.upgrade();
        }
        assert_eq!(harpoon.cooldown, MIN_UPGRADE_COOLDOWN);
    }

    #[test]
    fn test_projectile_velocity_and_damage() {
        let harpoon = Weapon::new(WeaponKind::Harpoon);
        let p = Projectile::new(1, Vec2::ZERO, Vec2::new(0.0, 50.0), &harpoon, 2.5);
        assert!((p.vel - Vec2::new(0.0, 10.0)).length() < 1e-5);
        assert_eq!(p.damage, 25.0);
        assert_eq!(p.pierce, 1);
    }

    #[test]
    fn test_projectile_zero_aim() {
        let harpoon = Weapon::new(WeaponKind::Harpoon);
        let mut p = Projectile::new(1, Vec2::ONE, Vec2::ONE, &harpoon, 1.0);
        p.advance();
        assert_eq!(p.pos, Vec2::ONE);
    }

    #[test]
    fn test_hit_set_blocks_repeat_hits() {
        let trident = Weapon::new(WeaponKind::Trident);
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::X, &trident, 1.0);
        assert!(p.register_hit(7));
        for _ in 0..10 {
            assert!(!p.register_hit(7));
        }
        assert_eq!(p.pierce, 2);
        assert!(p.register_hit(8));
        assert!(p.register_hit(9));
        assert!(p.is_spent());
        assert!(!p.register_hit(10));
    }

    #[test]
    fn test_hit_radius() {
        let net = Weapon::new(WeaponKind::Net);
        let harpoon = Weapon::new(WeaponKind::Harpoon);
        let n = Projectile::new(1, Vec2::ZERO, Vec2::X, &net, 1.0);
        let h = Projectile::new(2, Vec2::ZERO, Vec2::X, &harpoon, 1.0);
        assert_eq!(n.hit_radius(20.0), 80.0);
        assert_eq!(h.hit_radius(20.0), 28.0);
    }
}
