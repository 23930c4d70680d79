//! Procedural world streaming
//!
//! The world is an infinite grid of 500x500 chunks. Every chunk in the 7x7
//! block around the player is generated exactly once per run from its own
//! seeded RNG; the generated set is never cleared, so an evicted chunk that
//! comes back into range is not regenerated.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, circles_overlap, point_in_obstacles};
use crate::chebyshev_distance;
use crate::consts::*;

/// Chunk grid coordinate
pub type ChunkCoord = (i32, i32);

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Obstacle types (all block movement and projectiles the same way)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Coral,
    Rock,
    Seaweed,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Coral, ObstacleKind::Rock, ObstacleKind::Seaweed];

    /// Inclusive (width, height) ranges
    fn size_ranges(self) -> ((i32, i32), (i32, i32)) {
        match self {
            ObstacleKind::Seaweed => ((40, 60), (60, 100)),
            ObstacleKind::Coral | ObstacleKind::Rock => ((50, 100), (50, 100)),
        }
    }
}

/// Static obstacle; never mutated after generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
}

/// Loot chest, opened once on touch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    pub pos: Vec2,
    pub opened: bool,
}

impl Chest {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, opened: false }
    }

    /// Open if the player touches it; true only on the opening tick
    pub fn try_open(&mut self, player_pos: Vec2, player_size: f32) -> bool {
        if self.opened || !circles_overlap(player_pos, player_size, self.pos, CHEST_SIZE) {
            return false;
        }
        self.opened = true;
        true
    }
}

/// Buff shrine, used once on touch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shrine {
    pub pos: Vec2,
    pub used: bool,
}

impl Shrine {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, used: false }
    }

    /// Activate if the player touches it; true only on the activating tick
    pub fn try_use(&mut self, player_pos: Vec2, player_size: f32) -> bool {
        if self.used || !circles_overlap(player_pos, player_size, self.pos, SHRINE_SIZE) {
            return false;
        }
        self.used = true;
        true
    }
}

/// Static world content plus the permanent chunk generation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub seed: u64,
    /// Every chunk ever generated this run
    pub generated: BTreeSet<ChunkCoord>,
    /// Active obstacles (near the player)
    pub obstacles: Vec<Obstacle>,
    pub chests: Vec<Chest>,
    pub shrines: Vec<Shrine>,
}

/// Chunk containing a world position
pub fn chunk_of(pos: Vec2) -> ChunkCoord {
    let size = CHUNK_SIZE as f32;
    ((pos.x / size).floor() as i32, (pos.y / size).floor() as i32)
}

/// True for the empty 3x3 block around the origin
pub fn is_safe_zone(chunk: ChunkCoord) -> bool {
    chunk.0.abs() <= SAFE_ZONE_RADIUS && chunk.1.abs() <= SAFE_ZONE_RADIUS
}

/// Stable per-chunk seed (FNV-1a over run seed and coordinates)
pub fn chunk_seed(world_seed: u64, chunk: ChunkCoord) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    hash = fnv1a(hash, &world_seed.to_le_bytes());
    hash = fnv1a(hash, &chunk.0.to_le_bytes());
    fnv1a(hash, &chunk.1.to_le_bytes())
}

fn fnv1a(mut state: u64, bytes: &[u8]) -> u64 {
    for byte in bytes {
        state ^= u64::from(*byte);
        state = state.wrapping_mul(FNV_PRIME);
    }
    state
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            generated: BTreeSet::new(),
            obstacles: Vec::new(),
            chests: Vec::new(),
            shrines: Vec::new(),
        }
    }

    pub fn is_generated(&self, chunk: ChunkCoord) -> bool {
        self.generated.contains(&chunk)
    }

    /// Generate a chunk if it has never been generated.
    ///
    /// Returns the number of obstacles placed, or `None` if the chunk was
    /// already generated.
    pub fn generate_chunk(&mut self, chunk: ChunkCoord) -> Option<usize> {
        if !self.generated.insert(chunk) {
            return None;
        }
        if is_safe_zone(chunk) {
            return Some(0);
        }

        let mut rng = Pcg32::seed_from_u64(chunk_seed(self.seed, chunk));
        let base_x = chunk.0 * CHUNK_SIZE;
        let base_y = chunk.1 * CHUNK_SIZE;

        let count = rng.random_range(3..=8);
        for _ in 0..count {
            let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
            let ((w_min, w_max), (h_min, h_max)) = kind.size_ranges();
            let w = rng.random_range(w_min..=w_max);
            let h = rng.random_range(h_min..=h_max);
            let x = base_x + rng.random_range(0..=CHUNK_SIZE - w);
            let y = base_y + rng.random_range(0..=CHUNK_SIZE - h);
            self.obstacles.push(Obstacle {
                kind,
                rect: Rect::new(x as f32, y as f32, w as f32, h as f32),
            });
        }

        if rng.random_bool(CHEST_CHANCE) {
            if let Some(pos) = self.find_loot_spot(&mut rng, base_x, base_y) {
                self.chests.push(Chest::new(pos));
            }
        }
        if rng.random_bool(SHRINE_CHANCE) {
            if let Some(pos) = self.find_loot_spot(&mut rng, base_x, base_y) {
                self.shrines.push(Shrine::new(pos));
            }
        }

        log::debug!("Generated chunk {:?}: {} obstacles", chunk, count);
        Some(count)
    }

    /// Rejection-sample a loot anchor outside every obstacle
    fn find_loot_spot(&self, rng: &mut Pcg32, base_x: i32, base_y: i32) -> Option<Vec2> {
        let range = LOOT_MARGIN..=CHUNK_SIZE - LOOT_MARGIN;
        for _ in 0..LOOT_PLACEMENT_ATTEMPTS {
            let x = base_x + rng.random_range(range.clone());
            let y = base_y + rng.random_range(range.clone());
            let pos = Vec2::new(x as f32, y as f32);
            if !point_in_obstacles(pos, &self.obstacles) {
                return Some(pos);
            }
        }
        None
    }

    /// Generate the 7x7 block around the player and evict far obstacles.
    ///
    /// Returns newly generated chunks with their obstacle counts.
    pub fn update(&mut self, player_pos: Vec2) -> Vec<(ChunkCoord, usize)> {
        let (cx, cy) = chunk_of(player_pos);
        let mut fresh = Vec::new();
        for dx in -CHUNK_VIEW_RADIUS..=CHUNK_VIEW_RADIUS {
            for dy in -CHUNK_VIEW_RADIUS..=CHUNK_VIEW_RADIUS {
                let chunk = (cx + dx, cy + dy);
                if let Some(count) = self.generate_chunk(chunk) {
                    fresh.push((chunk, count));
                }
            }
        }
        self.evict(player_pos);
        fresh
    }

    /// Drop obstacles (by center) and loot beyond the horizon.
    ///
    /// Evicted loot is gone for the run; its chunk stays generated.
    pub fn evict(&mut self, player_pos: Vec2) {
        let in_range = |p: Vec2| chebyshev_distance(p, player_pos) <= OBSTACLE_HORIZON;
        self.obstacles.retain(|o| in_range(o.rect.center()));
        self.chests.retain(|c| in_range(c.pos));
        self.shrines.retain(|s| in_range(s.pos));
    }

    /// Remove consumed chests and shrines
    pub fn compact(&mut self) {
        self.chests.retain(|c| !c.opened);
        self.shrines.retain(|s| !s.used);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_of_negative() {
        assert_eq!(chunk_of(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(chunk_of(Vec2::new(499.9, 500.0)), (0, 1));
        assert_eq!(chunk_of(Vec2::new(-0.1, -500.0)), (-1, -1));
        assert_eq!(chunk_of(Vec2::new(-500.1, 0.0)), (-2, 0));
    }

    #[test]
    fn test_safe_zone_is_empty() {
        for seed in 0..20 {
            let mut world = World::new(seed);
            assert_eq!(world.generate_chunk((0, 0)), Some(0));
            assert_eq!(world.generate_chunk((1, -1)), Some(0));
            assert!(world.obstacles.is_empty());
            assert!(world.chests.is_empty());
            assert!(world.shrines.is_empty());
            assert!(world.is_generated((0, 0)));
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut world = World::new(7);
        let count = world.generate_chunk((5, 3)).unwrap();
        assert!((3..=8).contains(&count));
        let snapshot = (world.obstacles.len(), world.chests.len(), world.shrines.len());
        assert_eq!(world.generate_chunk((5, 3)), None);
        assert_eq!(
            snapshot,
            (world.obstacles.len(), world.chests.len(), world.shrines.len())
        );
    }

    #[test]
    fn test_generation_is_deterministic_per_chunk() {
        let mut a = World::new(1234);
        let mut b = World::new(1234);
        a.generate_chunk((-4, 9));
        b.generate_chunk((2, 2));
        b.generate_chunk((-4, 9));
        let from_b: Vec<_> = b
            .obstacles
            .iter()
            .filter(|o| chunk_of(o.rect.center()) == (-4, 9))
            .cloned()
            .collect();
        assert_eq!(a.obstacles, from_b);
    }

    #[test]
    fn test_obstacles_fit_inside_chunk() {
        let mut world = World::new(99);
        for cx in 2..8 {
            for cy in -6..-2 {
                world.generate_chunk((cx, cy));
            }
        }
        for o in &world.obstacles {
            let (cx, cy) = chunk_of(Vec2::new(o.rect.x, o.rect.y));
            let base = Vec2::new((cx * CHUNK_SIZE) as f32, (cy * CHUNK_SIZE) as f32);
            assert!(o.rect.right() <= base.x + CHUNK_SIZE as f32);
            assert!(o.rect.bottom() <= base.y + CHUNK_SIZE as f32);
            if o.kind == ObstacleKind::Seaweed {
                assert!((40.0..=60.0).contains(&o.rect.w));
            }
        }
    }

    #[test]
    fn test_loot_never_inside_obstacles() {
        let mut world = World::new(5);
        for cx in -10..10 {
            for cy in 2..10 {
                world.generate_chunk((cx, cy));
            }
        }
        for chest in &world.chests {
            assert!(!point_in_obstacles(chest.pos, &world.obstacles));
        }
        for shrine in &world.shrines {
            assert!(!point_in_obstacles(shrine.pos, &world.obstacles));
        }
    }

    #[test]
    fn test_update_generates_7x7_and_never_regenerates() {
        let mut world = World::new(3);
        let fresh = world.update(Vec2::ZERO);
        assert_eq!(fresh.len(), 49);
        assert_eq!(world.generated.len(), 49);

        // Walk far away, then come back
        world.update(Vec2::new(10_000.0, 0.0));
        assert!(world.obstacles.iter().all(|o| o.rect.center().x > 7_000.0));
        let fresh = world.update(Vec2::ZERO);
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_evict_far_obstacles() {
        let mut world = World::new(11);
        world.update(Vec2::ZERO);
        world.evict(Vec2::new(5_000.0, 5_000.0));
        assert!(world.obstacles.is_empty());
        assert_eq!(world.generated.len(), 49);
    }

    #[test]
    fn test_evict_far_loot() {
        let mut world = World::new(11);
        world.chests.push(Chest::new(Vec2::new(1_900.0, 0.0)));
        world.chests.push(Chest::new(Vec2::new(2_100.0, 0.0)));
        world.shrines.push(Shrine::new(Vec2::new(0.0, -2_500.0)));
        world.evict(Vec2::ZERO);
        assert_eq!(world.chests, vec![Chest::new(Vec2::new(1_900.0, 0.0))]);
        assert!(world.shrines.is_empty());
    }

    #[test]
    fn test_no_loot_when_chunk_is_blocked() {
        for cx in 5..200 {
            let chunk = (cx, 0);
            let mut world = World::new(21);
            // One rock covering the whole chunk rejects every loot anchor
            world.obstacles.push(Obstacle {
                kind: ObstacleKind::Rock,
                rect: Rect::new((cx * CHUNK_SIZE) as f32, 0.0, CHUNK_SIZE as f32, CHUNK_SIZE as f32),
            });
            assert!(world.generate_chunk(chunk).is_some());
            assert!(world.chests.is_empty(), "chest placed in blocked chunk {chunk:?}");
            assert!(world.shrines.is_empty(), "shrine placed in blocked chunk {chunk:?}");
        }
    }

    #[test]
    fn test_chest_opens_once() {
        let mut chest = Chest::new(Vec2::new(10.0, 0.0));
        assert!(chest.try_open(Vec2::ZERO, 25.0));
        assert!(!chest.try_open(Vec2::ZERO, 25.0));
        let mut shrine = Shrine::new(Vec2::new(500.0, 0.0));
        assert!(!shrine.try_use(Vec2::ZERO, 25.0));
        assert!(shrine.try_use(Vec2::new(490.0, 0.0), 25.0));
        assert!(!shrine.try_use(Vec2::new(490.0, 0.0), 25.0));
    }
}
