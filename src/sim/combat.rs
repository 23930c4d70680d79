//! Combat resolution
//!
//! Auto-fire, projectile/enemy movement, and the per-tick overlap rules that
//! turn contact into damage, deaths, drops and pickups. Removals are marked
//! during a pass and compacted after it.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{circle_hits_obstacles, circles_overlap};
use super::enemy::Enemy;
use super::progression::ShrineBuff;
use super::registry::{EntityRegistry, RemovalSet};
use super::state::{GameEvent, Player, XpGem};
use super::weapon::{Projectile, Weapon, WeaponKind};
use super::world::{Obstacle, World};
use crate::consts::*;
use crate::{chebyshev_distance, polar_to_cartesian};

/// Nearest enemy by Euclidean distance (first wins on ties)
pub fn nearest_enemy(pos: Vec2, enemies: &[Enemy]) -> Option<&Enemy> {
    enemies.iter().fold(None, |best: Option<&Enemy>, enemy| match best {
        Some(b) if b.pos.distance_squared(pos) <= enemy.pos.distance_squared(pos) => Some(b),
        _ => Some(enemy),
    })
}

/// Angular offsets of the three net projectiles around the facing angle
pub const fn net_spread() -> [f32; 3] {
    [-NET_SPREAD, 0.0, NET_SPREAD]
}

/// Aim points for one shot of `weapon` at `target`
pub fn aim_points(weapon: &Weapon, facing: f32, target: Vec2) -> Vec<Vec2> {
    match weapon.kind {
        WeaponKind::Net => net_spread()
            .iter()
            .map(|offset| target + polar_to_cartesian(NET_AIM_OFFSET, facing + offset))
            .collect(),
        _ => vec![target],
    }
}

/// Count every weapon's cooldown down and fire the ones that are ready.
///
/// Returns the number of projectiles created.
pub fn auto_fire(player: &mut Player, registry: &mut EntityRegistry, damage_factor: f32) -> usize {
    for weapon in &player.weapons {
        let remaining = player.cooldowns.entry(weapon.kind).or_insert(0);
        *remaining = remaining.saturating_sub(1);
    }

    let Some(target) = nearest_enemy(player.pos, &registry.enemies).map(|e| e.pos) else {
        return 0;
    };

    let mut fired = 0;
    for weapon in &player.weapons {
        let remaining = player.cooldowns.entry(weapon.kind).or_insert(0);
        if *remaining > 0 {
            continue;
        }
        for aim in aim_points(weapon, player.facing, target) {
            let id = registry.next_entity_id();
            registry.add_projectile(Projectile::new(id, player.pos, aim, weapon, damage_factor));
            fired += 1;
        }
        *remaining = weapon.cooldown;
    }
    fired
}

/// Move projectiles. Any projectile touching an obstacle or past the
/// projectile horizon is removed before it can hit anything.
pub fn advance_projectiles(registry: &mut EntityRegistry, obstacles: &[Obstacle], player_pos: Vec2) {
    let mut dead = RemovalSet::new();
    for projectile in &mut registry.projectiles {
        projectile.advance();
        if chebyshev_distance(projectile.pos, player_pos) > PROJECTILE_HORIZON
            || circle_hits_obstacles(projectile.pos, projectile.size, obstacles)
        {
            dead.insert(projectile.id);
        }
    }
    registry.retire_projectiles(&dead);
}

pub fn advance_enemies(registry: &mut EntityRegistry, player_pos: Vec2) {
    for enemy in &mut registry.enemies {
        enemy.advance(player_pos);
    }
}

/// Resolve every projectile against every enemy.
///
/// Each projectile damages a given enemy at most once; a first hit consumes
/// one pierce and a spent projectile stops hitting. Dead enemies drop gems
/// and leave the registry after the pass. Returns the number of kills.
pub fn resolve_projectile_hits(
    registry: &mut EntityRegistry,
    bosses_defeated: &mut u32,
    rng: &mut Pcg32,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut dead_enemies = RemovalSet::new();
    // (position, value) of gems to drop, deferred until after the pass
    let mut drops: Vec<(Vec2, u32)> = Vec::new();

    for projectile in &mut registry.projectiles {
        for enemy in &mut registry.enemies {
            if projectile.is_spent() {
                break;
            }
            if dead_enemies.contains(&enemy.id) {
                continue;
            }
            let hit_radius = projectile.hit_radius(enemy.size);
            if projectile.pos.distance(enemy.pos) >= hit_radius {
                continue;
            }
            if !projectile.register_hit(enemy.id) {
                continue;
            }
            if !enemy.take_damage(projectile.damage) {
                continue;
            }

            dead_enemies.insert(enemy.id);
            events.push(GameEvent::EnemyKilled {
                id: enemy.id,
                kind: enemy.kind,
                boss: enemy.boss,
            });
            if enemy.boss {
                *bosses_defeated += 1;
                let value = enemy.xp_value / BOSS_GEM_COUNT;
                for _ in 0..BOSS_GEM_COUNT {
                    let offset = Vec2::new(
                        rng.random_range(-BOSS_GEM_SCATTER..=BOSS_GEM_SCATTER) as f32,
                        rng.random_range(-BOSS_GEM_SCATTER..=BOSS_GEM_SCATTER) as f32,
                    );
                    drops.push((enemy.pos + offset, value));
                }
                log::info!("Boss defeated: {} ({} total)", enemy.kind.name(), bosses_defeated);
            } else {
                drops.push((enemy.pos, enemy.xp_value));
            }
        }
    }

    let spent: RemovalSet = registry
        .projectiles
        .iter()
        .filter(|p| p.is_spent())
        .map(|p| p.id)
        .collect();
    registry.retire_projectiles(&spent);
    registry.retire_enemies(&dead_enemies);

    for (pos, value) in drops {
        drop_gem(registry, rng, pos, value);
    }
    dead_enemies.len()
}

/// Spawn an xp gem with a random bob phase
pub fn drop_gem(registry: &mut EntityRegistry, rng: &mut Pcg32, pos: Vec2, value: u32) {
    let id = registry.next_entity_id();
    let phase = rng.random_range(0.0..std::f32::consts::TAU);
    registry.add_gem(XpGem::new(id, pos, value).with_bob_phase(phase));
}

/// Apply contact damage from at most one overlapping enemy (the first in
/// iteration order). Returns true if the player died.
pub fn resolve_enemy_contact(
    player: &mut Player,
    enemies: &[Enemy],
    events: &mut Vec<GameEvent>,
) -> bool {
    let Some(enemy) = enemies
        .iter()
        .find(|e| circles_overlap(player.pos, player.size, e.pos, e.size))
    else {
        return false;
    };
    let lethal = player.take_damage(enemy.damage);
    events.push(GameEvent::PlayerDamaged {
        amount: enemy.damage,
        hp: player.hp,
    });
    lethal
}

/// Collect gems, open chests and use shrines the player is touching.
///
/// Gem collection stops at the first level-up so a single tick produces at
/// most one level-up. Returns true if the player leveled up.
pub fn collect_pickups(
    player: &mut Player,
    registry: &mut EntityRegistry,
    world: &mut World,
    rng: &mut Pcg32,
    events: &mut Vec<GameEvent>,
) -> bool {
    let mut collected = RemovalSet::new();
    let mut leveled_up = false;
    for gem in &mut registry.gems {
        if !gem.update(player.pos, player.size) {
            continue;
        }
        collected.insert(gem.id);
        events.push(GameEvent::GemCollected { value: gem.value });
        if player.gain_xp(gem.value) {
            leveled_up = true;
            events.push(GameEvent::LevelUp {
                level: player.level,
            });
            break;
        }
    }
    registry.retire_gems(&collected);

    let mut chest_drops = Vec::new();
    for chest in &mut world.chests {
        if chest.try_open(player.pos, player.size) {
            let weapon = WeaponKind::ALL[rng.random_range(0..WeaponKind::ALL.len())];
            player.add_weapon(weapon);
            chest_drops.push(chest.pos);
            events.push(GameEvent::ChestOpened { weapon });
            log::debug!("Chest opened: {}", weapon.name());
        }
    }
    for pos in chest_drops {
        drop_gem(registry, rng, pos, CHEST_XP);
    }

    for shrine in &mut world.shrines {
        if shrine.try_use(player.pos, player.size) {
            let buff = ShrineBuff::roll(rng);
            buff.apply(player);
            events.push(GameEvent::ShrineUsed { buff });
            log::debug!("Shrine used: {:?}", buff);
        }
    }
    world.compact();

    leveled_up
}
