//! Entity registry
//!
//! Owns every dynamic entity (enemies, projectiles, xp gems) and issues their
//! stable integer IDs. Removal during a phase is deferred: phases collect IDs
//! into a [`RemovalSet`] and the registry compacts once the phase is done.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::state::XpGem;
use super::weapon::Projectile;
use crate::chebyshev_distance;
use crate::consts::{ENEMY_HORIZON, GEM_HORIZON, PROJECTILE_HORIZON};

/// Stable entity identity, unique for the run
pub type EntityId = u32;

/// IDs marked for removal during a phase
pub type RemovalSet = BTreeSet<EntityId>;

/// Counts of entities dropped by a culling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    pub enemies: usize,
    pub projectiles: usize,
    pub gems: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Uncollected xp gems (sorted by id)
    pub gems: Vec<XpGem>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            enemies: Vec::new(),
            projectiles: Vec::new(),
            gems: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = enemy.id;
        self.enemies.push(enemy);
        id
    }

    pub fn add_projectile(&mut self, projectile: Projectile) -> EntityId {
        let id = projectile.id;
        self.projectiles.push(projectile);
        id
    }

    pub fn add_gem(&mut self, gem: XpGem) -> EntityId {
        let id = gem.id;
        self.gems.push(gem);
        id
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn remove_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    pub fn remove_projectile(&mut self, id: EntityId) -> Option<Projectile> {
        let index = self.projectiles.iter().position(|p| p.id == id)?;
        Some(self.projectiles.remove(index))
    }

    pub fn remove_gem(&mut self, id: EntityId) -> Option<XpGem> {
        let index = self.gems.iter().position(|g| g.id == id)?;
        Some(self.gems.remove(index))
    }

    /// Compaction passes for IDs marked during a phase
    pub fn retire_enemies(&mut self, dead: &RemovalSet) {
        if !dead.is_empty() {
            self.enemies.retain(|e| !dead.contains(&e.id));
        }
    }

    pub fn retire_projectiles(&mut self, dead: &RemovalSet) {
        if !dead.is_empty() {
            self.projectiles.retain(|p| !dead.contains(&p.id));
        }
    }

    pub fn retire_gems(&mut self, dead: &RemovalSet) {
        if !dead.is_empty() {
            self.gems.retain(|g| !dead.contains(&g.id));
        }
    }

    /// Drop entities beyond their Chebyshev horizon from the player
    pub fn cull(&mut self, player_pos: Vec2) -> CullStats {
        let before = (self.enemies.len(), self.projectiles.len(), self.gems.len());
        self.enemies
            .retain(|e| chebyshev_distance(e.pos, player_pos) <= ENEMY_HORIZON);
        self.projectiles
            .retain(|p| chebyshev_distance(p.pos, player_pos) <= PROJECTILE_HORIZON);
        self.gems
            .retain(|g| chebyshev_distance(g.pos, player_pos) <= GEM_HORIZON);
        CullStats {
            enemies: before.0 - self.enemies.len(),
            projectiles: before.1 - self.projectiles.len(),
            gems: before.2 - self.gems.len(),
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.gems.sort_by_key(|g| g.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::weapon::{Weapon, WeaponKind};

    fn shark_at(registry: &mut EntityRegistry, pos: Vec2) -> EntityId {
        let id = registry.next_entity_id();
        registry.add_enemy(Enemy::new(id, EnemyKind::Shark, pos, false, 1.0))
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut registry = EntityRegistry::new();
        let a = registry.next_entity_id();
        let b = registry.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_add_and_remove() {
        let mut registry = EntityRegistry::new();
        let id = shark_at(&mut registry, Vec2::ZERO);
        assert!(registry.enemy(id).is_some());
        assert_eq!(registry.remove_enemy(id).map(|e| e.id), Some(id));
        assert!(registry.remove_enemy(id).is_none());
    }

    #[test]
    fn test_remove_projectile_and_gem() {
        let mut registry = EntityRegistry::new();
        let harpoon = Weapon::new(WeaponKind::Harpoon);
        let shot = registry.next_entity_id();
        registry.add_projectile(Projectile::new(shot, Vec2::ZERO, Vec2::X, &harpoon, 1.0));
        let gem = registry.next_entity_id();
        registry.add_gem(XpGem::new(gem, Vec2::ONE, 5));

        // Ids are per-kind lookups: a projectile id never removes a gem
        assert!(registry.remove_gem(shot).is_none());
        assert_eq!(registry.remove_projectile(shot).map(|p| p.id), Some(shot));
        assert!(registry.projectiles.is_empty());
        assert_eq!(registry.remove_gem(gem).map(|g| g.value), Some(5));
        assert!(registry.gems.is_empty());
        assert!(registry.remove_projectile(shot).is_none());
    }

    #[test]
    fn test_retire_marked() {
        let mut registry = EntityRegistry::new();
        let a = shark_at(&mut registry, Vec2::ZERO);
        let b = shark_at(&mut registry, Vec2::X);
        let dead: RemovalSet = [a].into_iter().collect();
        registry.retire_enemies(&dead);
        assert_eq!(registry.enemies.len(), 1);
        assert_eq!(registry.enemies[0].id, b);
    }

    #[test]
    fn test_cull_horizons() {
        let mut registry = EntityRegistry::new();
        shark_at(&mut registry, Vec2::new(1999.0, -1999.0));
        shark_at(&mut registry, Vec2::new(0.0, 2001.0));

        let harpoon = Weapon::new(WeaponKind::Harpoon);
        let near = registry.next_entity_id();
        registry.add_projectile(Projectile::new(near, Vec2::new(1400.0, 0.0), Vec2::ZERO, &harpoon, 1.0));
        let far = registry.next_entity_id();
        registry.add_projectile(Projectile::new(far, Vec2::new(1600.0, 0.0), Vec2::ZERO, &harpoon, 1.0));

        let gem = registry.next_entity_id();
        registry.add_gem(XpGem::new(gem, Vec2::new(-2500.0, 0.0), 5));

        let stats = registry.cull(Vec2::ZERO);
        assert_eq!(
            stats,
            CullStats {
                enemies: 1,
                projectiles: 1,
                gems: 1
            }
        );
        assert_eq!(registry.projectiles[0].id, near);
    }
}
