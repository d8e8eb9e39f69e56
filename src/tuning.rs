//! Data-driven game balance
//!
//! Every timing and size the simulation uses comes from a `Tuning`. Values can
//! be overridden from a JSON file; missing keys fall back to the defaults in
//! `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PlayField;
use crate::consts::*;

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("could not read tuning file")]
    Io(#[from] std::io::Error),
    #[error("tuning file is not valid JSON")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("play field width {width} leaves no room to spawn with margin {margin}")]
    FieldTooNarrow { width: f32, margin: f32 },
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Paddle edge length (square)
    pub paddle_size: f32,
    /// Gap between the bottom edge and the paddle's base position
    pub paddle_baseline: f32,
    /// Keep the paddle centre inside the play field while dragging
    pub clamp_paddle: bool,

    /// Falling block edge length (square)
    pub block_size: f32,
    /// Seconds a block needs to cross the field
    pub fall_duration: f32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Block spin in radians per second
    pub rotation_speed: f32,
    /// How far below the bottom edge a block's descent ends
    pub exit_depth: f32,
    /// Horizontal inset for spawn positions
    pub spawn_margin: f32,

    /// Seconds between game over and the fresh game
    pub restart_delay: f32,
    /// Cross-fade when the fresh game is installed
    pub crossfade_duration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_size: PADDLE_SIZE,
            paddle_baseline: PADDLE_BASELINE,
            clamp_paddle: true,

            block_size: BLOCK_SIZE,
            fall_duration: BLOCK_FALL_DURATION,
            spawn_interval: BLOCK_SPAWN_INTERVAL,
            rotation_speed: BLOCK_ROTATION_SPEED,
            exit_depth: BLOCK_EXIT_DEPTH,
            spawn_margin: SPAWN_MARGIN,

            restart_delay: RESTART_DELAY,
            crossfade_duration: CROSSFADE_DURATION,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON text
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read tuning from a file, falling back to defaults on any problem
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("paddle_size", self.paddle_size),
            ("block_size", self.block_size),
            ("fall_duration", self.fall_duration),
            ("spawn_interval", self.spawn_interval),
        ];
        for (field, value) in positive {
            // also catches NaN
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        let non_negative = [
            ("paddle_baseline", self.paddle_baseline),
            ("rotation_speed", self.rotation_speed),
            ("exit_depth", self.exit_depth),
            ("spawn_margin", self.spawn_margin),
            ("restart_delay", self.restart_delay),
            ("crossfade_duration", self.crossfade_duration),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Check that `field` leaves a non-empty spawn range
    pub fn check_field(&self, field: &PlayField) -> Result<(), TuningError> {
        let (lo, hi) = self.spawn_range(field);
        if lo >= hi {
            return Err(TuningError::FieldTooNarrow {
                width: field.width(),
                margin: self.spawn_margin,
            });
        }
        Ok(())
    }

    /// Integer spawn range `[lo, hi)` for block x positions
    pub fn spawn_range(&self, field: &PlayField) -> (i32, i32) {
        let lo = (field.min.x + self.spawn_margin) as i32;
        let hi = (field.max.x - self.spawn_margin) as i32;
        (lo, hi)
    }

    /// Resting y of the paddle centre
    pub fn paddle_y(&self, field: &PlayField) -> f32 {
        field.min.y + self.paddle_baseline + self.paddle_size
    }
}
