//! Game colors

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::sim::Swatch;

/// RGBA colors used by the game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Background
    pub off_black: Vec4,
    /// Labels and the base swatch
    pub off_white: Vec4,
    pub orange: Vec4,
    pub blue: Vec4,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            off_black: Vec4::new(0.2, 0.2, 0.2, 1.0),
            off_white: Vec4::new(0.98, 0.98, 0.98, 1.0),
            orange: Vec4::new(1.0, 0.5, 0.0, 1.0),
            blue: Vec4::new(0.0, 0.5, 1.0, 1.0),
        }
    }
}

impl Palette {
    pub fn swatch(&self, swatch: Swatch) -> Vec4 {
        match swatch {
            Swatch::White => self.off_white,
            Swatch::Orange => self.orange,
            Swatch::Blue => self.blue,
        }
    }
}
