//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run deterministically. Phase order
//! within a playing tick:
//!
//! 1. player movement
//! 2. chunk streaming around the player
//! 3. spawn director
//! 4. auto-fire
//! 5. projectile and enemy movement
//! 6. projectile hits, deaths and drops
//! 7. enemy contact (may end the run)
//! 8. pickups (may open the level-up modal)
//! 9. culling and id ordering

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat;
use super::progression::roll_options;
use super::registry::CullStats;
use super::state::{GameEvent, GamePhase, GameState};
use crate::settings::DebugTuning;

/// Movement keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveKeys {
    /// Raw input axis in screen coordinates (up is -y)
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        axis
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub movement: MoveKeys,
    /// Show/hide the debug overlay
    pub toggle_debug: bool,
    /// Pause toggle
    pub pause: bool,
    /// Index into the level-up offer (only read while leveling up)
    pub level_up_choice: Option<usize>,
    /// Start a new run (only read after game over)
    pub restart: bool,
    /// Speed and damage multipliers from the debug overlay
    pub tuning: DebugTuning,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if input.toggle_debug {
        state.debug_visible = !state.debug_visible;
    }

    match state.phase {
        GamePhase::GameOver => {
            if input.restart {
                match state.restart() {
                    Ok(fresh) => {
                        let debug_visible = state.debug_visible;
                        *state = fresh;
                        state.debug_visible = debug_visible;
                    }
                    Err(err) => log::warn!("Restart rejected: {}", err),
                }
            }
            return;
        }
        GamePhase::LevelUp => {
            if let Some(index) = input.level_up_choice {
                if let Err(err) = state.choose_level_up(index) {
                    log::warn!("Level-up choice rejected: {}", err);
                }
            }
            return;
        }
        GamePhase::Playing | GamePhase::Paused => {}
    }

    if input.pause {
        state.phase = match state.phase {
            GamePhase::Paused => GamePhase::Playing,
            _ => GamePhase::Paused,
        };
    }
    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;
    let tuning = input.tuning.clamped();

    state
        .player
        .steer(input.movement.axis(), tuning.speed_factor, &state.world.obstacles);

    for (chunk, obstacles) in state.world.update(state.player.pos) {
        state
            .events
            .push(GameEvent::ChunkGenerated { chunk, obstacles });
    }

    state.spawner.update(
        state.time_ticks,
        state.player.pos,
        &mut state.registry,
        &mut state.rng,
        &mut state.events,
    );

    combat::auto_fire(&mut state.player, &mut state.registry, tuning.damage_factor);
    combat::advance_projectiles(&mut state.registry, &state.world.obstacles, state.player.pos);
    combat::advance_enemies(&mut state.registry, state.player.pos);

    combat::resolve_projectile_hits(
        &mut state.registry,
        &mut state.spawner.bosses_defeated,
        &mut state.rng,
        &mut state.events,
    );

    if combat::resolve_enemy_contact(&mut state.player, &state.registry.enemies, &mut state.events)
    {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            ticks: state.time_ticks,
            level: state.player.level,
        });
        log::info!(
            "Game over after {} ticks at level {}",
            state.time_ticks,
            state.player.level
        );
        return;
    }

    let leveled_up = combat::collect_pickups(
        &mut state.player,
        &mut state.registry,
        &mut state.world,
        &mut state.rng,
        &mut state.events,
    );
    if leveled_up {
        state.level_up_options = roll_options(&state.player, &mut state.rng);
        state.phase = GamePhase::LevelUp;
        log::info!("Level up: now level {}", state.player.level);
    }

    let culled = state.registry.cull(state.player.pos);
    if culled != CullStats::default() {
        log::debug!("Culled {:?}", culled);
    }
    state.registry.normalize_order();
}
