//! Collision geometry
//!
//! Obstacles are axis-aligned rectangles; every moving entity is a circle,
//! tested against rectangles through its bounding square. Overlap tests are
//! strict: touching edges do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::Obstacle;

/// Axis-aligned rectangle (top-left corner + extent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Bounding square of a circle
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Point containment, inclusive of the top/left edge only
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }
}

/// Strict circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Does a circle's bounding square overlap any obstacle?
pub fn circle_hits_obstacles(center: Vec2, radius: f32, obstacles: &[Obstacle]) -> bool {
    let hitbox = Rect::around(center, radius);
    obstacles.iter().any(|o| hitbox.overlaps(&o.rect))
}

pub fn point_in_obstacles(p: Vec2, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|o| o.rect.contains_point(p))
}

/// Resolve a move of a circle against obstacles, axis by axis.
///
/// The full move is tested first. For every obstacle it would hit, the X-only
/// and Y-only moves are tested separately and an axis is blocked if its
/// component move also hits. Unblocked axes are applied, so the mover slides
/// along edges.
pub fn resolve_axis_move(pos: Vec2, delta: Vec2, radius: f32, obstacles: &[Obstacle]) -> Vec2 {
    let target = pos + delta;
    let full = Rect::around(target, radius);
    let x_only = Rect::around(Vec2::new(target.x, pos.y), radius);
    let y_only = Rect::around(Vec2::new(pos.x, target.y), radius);

    let mut can_move_x = true;
    let mut can_move_y = true;
    for obstacle in obstacles.iter().filter(|o| full.overlaps(&o.rect)) {
        if x_only.overlaps(&obstacle.rect) {
            can_move_x = false;
        }
        if y_only.overlaps(&obstacle.rect) {
            can_move_y = false;
        }
    }

    Vec2::new(
        if can_move_x { target.x } else { pos.x },
        if can_move_y { target.y } else { pos.y },
    )
}
