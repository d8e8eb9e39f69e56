//! Presentation-facing data
//!
//! Nothing here draws; it describes what the host should draw.

pub mod hud;
pub mod palette;

pub use hud::{LabelView, SceneView, SpriteView, Strings};
pub use palette::Palette;
