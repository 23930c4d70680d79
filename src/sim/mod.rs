//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one run stream, one derived stream per chunk)
//! - Stable iteration order (by entity ID)
//! - No rendering, input or platform dependencies

pub mod collision;
pub mod combat;
pub mod difficulty;
pub mod enemy;
pub mod progression;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;
pub mod world;

pub use collision::{Rect, circles_overlap, resolve_axis_move};
pub use difficulty::{EnemyStats, boss_scale, difficulty_scale, scale_stats};
pub use enemy::{Enemy, EnemyKind};
pub use progression::{LevelUpOption, ShrineBuff, roll_options};
pub use registry::{CullStats, EntityId, EntityRegistry, RemovalSet};
pub use spawn::SpawnDirector;
pub use state::{GameEvent, GamePhase, GameState, HudSnapshot, Player, XpGem};
pub use tick::{MoveKeys, TickInput, tick};
pub use weapon::{Projectile, Weapon, WeaponKind};
pub use world::{Chest, ChunkCoord, Obstacle, ObstacleKind, Shrine, World, chunk_of, chunk_seed};
