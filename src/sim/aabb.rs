//! Axis-aligned bounding boxes
//!
//! All collision detection in the game (ball vs paddles, obstacles,
//! powerups) runs on center-based AABB overlap tests.

use glam::Vec2;

/// A center-based axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn half(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.size.x * 0.5
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.size.x * 0.5
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.size.y * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y * 0.5
    }

    /// Overlap test. Boxes that merely touch edge-to-edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs() * 2.0;
        delta.x < self.size.x + other.size.x && delta.y < self.size.y + other.size.y
    }
}
