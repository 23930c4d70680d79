//! Game state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives here and is read-only
//! outside the tick.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::resolve_axis_move;
use super::enemy::EnemyKind;
use super::progression::{LevelUpOption, ShrineBuff};
use super::registry::{EntityId, EntityRegistry};
use super::spawn::SpawnDirector;
use super::weapon::{Weapon, WeaponKind};
use super::world::{ChunkCoord, Obstacle, World};
use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation paused by the player
    Paused,
    /// Waiting for one of the offered level-up options
    LevelUp,
    /// Run ended (terminal; restart builds a fresh state)
    GameOver,
}

/// The diver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Facing angle (radians) of the last movement
    pub facing: f32,
    /// Unit direction of the last movement
    pub last_move: Vec2,
    /// Collision radius
    pub size: f32,
    /// Units per tick
    pub speed: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    /// Owned weapons, at most one per kind
    pub weapons: Vec<Weapon>,
    /// Remaining cooldown ticks per weapon kind
    pub cooldowns: BTreeMap<WeaponKind, u32>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            facing: 0.0,
            last_move: Vec2::new(0.0, -1.0),
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            level: 1,
            xp: 0,
            xp_to_next: PLAYER_XP_TO_FIRST_LEVEL,
            weapons: vec![Weapon::new(WeaponKind::Harpoon)],
            cooldowns: BTreeMap::new(),
        }
    }
}

impl Player {
    /// Move by a raw input axis (components in -1..=1, screen coordinates).
    ///
    /// Diagonals are scaled by 0.707 and the move is resolved axis by axis
    /// against obstacles.
    pub fn steer(&mut self, axis: Vec2, speed_factor: f32, obstacles: &[Obstacle]) {
        if axis == Vec2::ZERO {
            return;
        }
        self.last_move = axis.normalize();
        self.facing = axis.y.atan2(axis.x);

        let axis = if axis.x != 0.0 && axis.y != 0.0 {
            axis * DIAGONAL_FACTOR
        } else {
            axis
        };
        let delta = axis * self.speed * speed_factor;
        self.pos = resolve_axis_move(self.pos, delta, self.size, obstacles);
    }

    /// Apply damage, returns true if this was lethal
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.hp <= 0
    }

    pub fn weapon(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapon(kind).is_some()
    }
}

/// An experience gem dropped by a dead enemy or a chest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpGem {
    pub id: EntityId,
    pub pos: Vec2,
    pub value: u32,
    pub size: f32,
    /// Visual bob phase
    pub bob_phase: f32,
}

impl XpGem {
    pub fn new(id: EntityId, pos: Vec2, value: u32) -> Self {
        Self {
            id,
            pos,
            value,
            size: GEM_SIZE,
            bob_phase: 0.0,
        }
    }

    pub fn with_bob_phase(mut self, phase: f32) -> Self {
        self.bob_phase = phase;
        self
    }

    /// Drift toward the player when magnetised; true once collected
    pub fn update(&mut self, player_pos: Vec2, player_size: f32) -> bool {
        self.bob_phase += 0.1;
        let to_player = player_pos - self.pos;
        let dist = to_player.length();
        if dist < GEM_MAGNET_RADIUS && dist > 0.0 {
            self.pos += to_player / dist * GEM_MAGNET_SPEED;
        }
        // Collection uses the pre-move distance
        dist < player_size + self.size
    }
}

/// Events emitted during a tick, for renderer/audio layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ChunkGenerated { chunk: ChunkCoord, obstacles: usize },
    EnemySpawned { id: EntityId, kind: EnemyKind, elite: bool },
    BossSpawned { id: EntityId, kind: EnemyKind },
    EnemyKilled { id: EntityId, kind: EnemyKind, boss: bool },
    PlayerDamaged { amount: i32, hp: i32 },
    GemCollected { value: u32 },
    LevelUp { level: u32 },
    ChestOpened { weapon: WeaponKind },
    ShrineUsed { buff: ShrineBuff },
    GameOver { ticks: u64, level: u32 },
}

/// Scalar HUD fields for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub hp: i32,
    pub max_hp: i32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub level: u32,
    pub time_ticks: u64,
    pub difficulty_scale: f32,
    /// Ticks until the next boss
    pub boss_countdown: u32,
    pub game_over: bool,
    pub leveling_up: bool,
    pub paused: bool,
    pub debug_visible: bool,
    pub level_up_options: Vec<String>,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Run RNG (spawn rolls, drops, level-up options)
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub registry: EntityRegistry,
    pub world: World,
    pub spawner: SpawnDirector,
    /// Options on offer while in `LevelUp`
    pub level_up_options: Vec<LevelUpOption>,
    /// Debug overlay visibility (toggled by input, drawn by the renderer)
    pub debug_visible: bool,
    /// Events from the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::default(),
            registry: EntityRegistry::new(),
            world: World::new(seed),
            spawner: SpawnDirector::new(),
            level_up_options: Vec::new(),
            debug_visible: false,
            events: Vec::new(),
        }
    }

    pub fn from_settings(settings: &crate::Settings) -> Self {
        Self::new(settings.seed)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Apply the chosen level-up option and resume play
    pub fn choose_level_up(&mut self, index: usize) -> SimResult<LevelUpOption> {
        if self.phase != GamePhase::LevelUp {
            return Err(SimError::NotLevelingUp);
        }
        let option = *self
            .level_up_options
            .get(index)
            .ok_or(SimError::InvalidChoice {
                index,
                available: self.level_up_options.len(),
            })?;
        option.apply(&mut self.player);
        self.level_up_options.clear();
        self.phase = GamePhase::Playing;
        log::info!("Level {} choice: {}", self.player.level, option.label());
        Ok(option)
    }

    /// Build the fresh run that replaces this one after game over
    pub fn restart(&self) -> SimResult<GameState> {
        if self.phase != GamePhase::GameOver {
            return Err(SimError::RestartWhileRunning);
        }
        let seed = self.seed.wrapping_add(1);
        log::info!("Restarting with seed {}", seed);
        Ok(GameState::new(seed))
    }

    /// Scalar HUD fields for this tick
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            hp: self.player.hp,
            max_hp: self.player.max_hp,
            xp: self.player.xp,
            xp_to_next: self.player.xp_to_next,
            level: self.player.level,
            time_ticks: self.time_ticks,
            difficulty_scale: self.spawner.difficulty_scale,
            boss_countdown: self.spawner.boss_countdown(),
            game_over: self.phase == GamePhase::GameOver,
            leveling_up: self.phase == GamePhase::LevelUp,
            paused: self.phase == GamePhase::Paused,
            debug_visible: self.debug_visible,
            level_up_options: self.level_up_options.iter().map(|o| o.label()).collect(),
        }
    }
}
