//! Collision detection between the paddle and falling blocks
//!
//! Both bodies are kinematic, so a contact only gates a state transition:
//! no penetration resolution, just axis-aligned box overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision category of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    FallingBlock,
}

/// A participant in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub category: Category,
    /// Entity id (0 for the paddle)
    pub id: u32,
}

impl Body {
    pub fn new(category: Category, id: u32) -> Self {
        Self { category, id }
    }
}

/// Two bodies whose boxes started overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

impl Contact {
    /// Order the contact as (player, other), or None when neither or both are the player
    pub fn player_first(&self) -> Option<(Body, Body)> {
        if self.a.category == self.b.category {
            return None;
        }
        if self.a.category == Category::Player {
            Some((self.a, self.b))
        } else if self.b.category == Category::Player {
            Some((self.b, self.a))
        } else {
            None
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box enclosing a `size` rectangle rotated by `angle` around `center`
    pub fn from_rotated(center: Vec2, size: Vec2, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let extent = Vec2::new(
            size.x * cos + size.y * sin,
            size.x * sin + size.y * cos,
        );
        Self::from_center_size(center, extent)
    }

    /// Strict overlap; boxes that only share an edge do not touch
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}
