//! Labels and the per-frame render snapshot
//!
//! Localized text is supplied by the host through `Strings`; the defaults are
//! English.

use std::path::Path;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use super::palette::Palette;
use crate::sim::{GameState, MainLabel};

const MAIN_LABEL_FONT_SIZE: f32 = 100.0;
const MAIN_LABEL_TOP_INSET: f32 = 250.0;
const SCORE_LABEL_FONT_SIZE: f32 = 50.0;
const SCORE_LABEL_BOTTOM_INSET: f32 = 150.0;

/// User-facing text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strings {
    pub start: String,
    pub game_over: String,
    /// Prepended to the score value
    pub score_prefix: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            start: "Start!".to_string(),
            game_over: "Game Over".to_string(),
            score_prefix: "Score: ".to_string(),
        }
    }
}

impl Strings {
    /// Parse a string table; missing keys keep their English default
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a string table from a JSON file, keeping English on any problem
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Using default strings ({}: {})", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(strings) => {
                log::info!("Loaded strings from {}", path.display());
                strings
            }
            Err(e) => {
                log::warn!("Using default strings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn score_label(&self, score: u32) -> String {
        format!("{}{}", self.score_prefix, score)
    }

    pub fn main_label(&self, label: MainLabel) -> &str {
        match label {
            MainLabel::Start => &self.start,
            MainLabel::GameOver => &self.game_over,
        }
    }
}

/// A colored rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub pos: Vec2,
    pub size: Vec2,
    /// Radians
    pub rotation: f32,
    pub color: Vec4,
}

/// A line of text centered on `pos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelView {
    pub text: String,
    pub pos: Vec2,
    pub font_size: f32,
    pub color: Vec4,
}

/// Everything the host needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    pub background: Vec4,
    /// None once the paddle has been destroyed
    pub paddle: Option<SpriteView>,
    pub blocks: Vec<SpriteView>,
    pub main_label: Option<LabelView>,
    pub score_label: LabelView,
    /// Opacity of this scene during a restart cross-fade (1 = fully shown)
    pub fade: f32,
}

impl SceneView {
    pub fn capture(state: &GameState, strings: &Strings, palette: &Palette, fade: f32) -> Self {
        let field = &state.field;

        let paddle = state.paddle.alive.then(|| SpriteView {
            pos: state.paddle.pos,
            size: state.paddle.size,
            rotation: 0.0,
            color: palette.swatch(state.paddle.selection),
        });

        let blocks = state
            .blocks
            .iter()
            .map(|b| SpriteView {
                pos: b.pos,
                size: b.size,
                rotation: b.rotation,
                color: palette.swatch(b.color),
            })
            .collect();

        let main_label = state.main_label.map(|label| LabelView {
            text: strings.main_label(label).to_string(),
            pos: Vec2::new(field.mid_x(), field.max.y - MAIN_LABEL_TOP_INSET),
            font_size: MAIN_LABEL_FONT_SIZE,
            color: palette.off_white,
        });

        let score_label = LabelView {
            text: strings.score_label(state.score),
            pos: Vec2::new(field.mid_x(), field.min.y + SCORE_LABEL_BOTTOM_INSET),
            font_size: SCORE_LABEL_FONT_SIZE,
            color: palette.off_white,
        };

        Self {
            background: palette.off_black,
            paddle,
            blocks,
            main_label,
            score_label,
            fade,
        }
    }
}
