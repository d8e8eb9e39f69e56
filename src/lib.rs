//! Colors to Collect - a falling-block color matching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, descent, collisions, game state)
//! - `game_loop`: Host-facing loop driving the simulation from touch and frame events
//! - `tuning`: Data-driven game balance
//! - `ui`: Palette, label strings and the render snapshot handed to the host

pub mod game_loop;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game_loop::GameLoop;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the host
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Paddle defaults
    pub const PADDLE_SIZE: f32 = 90.0;
    /// Paddle centre sits this far above the bottom edge (plus its own height)
    pub const PADDLE_BASELINE: f32 = 250.0;

    /// Falling block defaults
    pub const BLOCK_SIZE: f32 = 40.0;
    /// Seconds for a block to travel from the top to below the bottom edge
    pub const BLOCK_FALL_DURATION: f32 = 2.5;
    /// Seconds between spawns
    pub const BLOCK_SPAWN_INTERVAL: f32 = 1.5;
    /// Radians per second
    pub const BLOCK_ROTATION_SPEED: f32 = 2.0;
    /// Blocks finish their descent this far below the bottom edge
    pub const BLOCK_EXIT_DEPTH: f32 = 200.0;
    /// Horizontal inset for spawn positions
    pub const SPAWN_MARGIN: f32 = 16.0;

    /// Seconds between game over and the fresh game
    pub const RESTART_DELAY: f32 = 3.0;
    /// Cross-fade length when the fresh game is installed
    pub const CROSSFADE_DURATION: f32 = 1.0;

    /// Number of colors a paddle can cycle through
    pub const SWATCH_COUNT: u8 = 3;
}

/// Rectangle of the visible play area, y pointing up
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayField {
    pub min: Vec2,
    pub max: Vec2,
}

impl PlayField {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Field spanning `[0, width] x [0, height]`
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn mid_x(&self) -> f32 {
        (self.min.x + self.max.x) * 0.5
    }
}

impl Default for PlayField {
    /// Portrait phone-sized field
    fn default() -> Self {
        Self::from_size(750.0, 1334.0)
    }
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
