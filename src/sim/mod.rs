//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Body, Category, Contact};
pub use state::{FallingBlock, GameEvent, GamePhase, GameState, MainLabel, Paddle, Swatch};
pub use tick::{
    TickInput, handle_contact, handle_player_block_collision, tick, touch_down, touch_move,
    touch_up,
};
