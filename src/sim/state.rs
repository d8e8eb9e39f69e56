//! Game state and core simulation types
//!
//! A fresh `GameState` is built for every game; restarting means replacing it,
//! which drops every pending timer of the previous game along with it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Body, Category};
use crate::consts::SWATCH_COUNT;
use crate::tuning::Tuning;
use crate::{PlayField, lerp};

/// One of the three colors a paddle or block can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Swatch {
    #[default]
    White = 0,
    Orange = 1,
    Blue = 2,
}

impl Swatch {
    pub const ALL: [Swatch; SWATCH_COUNT as usize] = [Swatch::White, Swatch::Orange, Swatch::Blue];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Next swatch in the cycle, wrapping Blue back to White
    pub fn next(self) -> Self {
        Self::ALL[((self.index() + 1) % SWATCH_COUNT) as usize]
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first touch
    Init,
    /// Blocks are spawning and the paddle follows touches
    Playing,
    /// Paddle destroyed, waiting for the restart countdown
    GameOver,
}

/// Text shown in the middle of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainLabel {
    Start,
    GameOver,
}

/// Things that happened during a tick or input event, for sound/haptics
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// First touch started the game
    Started,
    /// Paddle switched to a new color
    ColorChanged { swatch: Swatch },
    BlockSpawned { id: u32, swatch: Swatch, x: f32 },
    /// Matching block caught
    BlockCaught { id: u32, score: u32 },
    /// Block fell past the bottom edge
    BlockMissed { id: u32 },
    /// Mismatched block hit the paddle
    GameOver { score: u32 },
    /// Fresh game installed after game over
    Restarted,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Centre position
    pub pos: Vec2,
    pub size: Vec2,
    /// Color the paddle currently collects
    pub selection: Swatch,
    /// False once the paddle has been destroyed by a mismatch
    pub alive: bool,
}

impl Paddle {
    pub fn new(pos: Vec2, edge: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(edge),
            selection: Swatch::White,
            alive: true,
        }
    }

    pub fn body(&self) -> Body {
        Body::new(Category::Player, 0)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}

/// A block falling from the top edge to below the bottom edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingBlock {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Swatch,
    /// Current spin (radians)
    pub rotation: f32,
    pub start_y: f32,
    pub end_y: f32,
    /// Seconds since the descent began
    pub elapsed: f32,
    /// Seconds the whole descent takes
    pub duration: f32,
    /// Cleared on first contact so a collision never fires twice
    pub active: bool,
}

impl FallingBlock {
    pub fn body(&self) -> Body {
        Body::new(Category::FallingBlock, self.id)
    }

    /// Bounding box of the block at its current rotation
    pub fn aabb(&self) -> Aabb {
        Aabb::from_rotated(self.pos, self.size, self.rotation)
    }

    /// Advance the descent; returns true once the block reached its end point
    pub fn advance(&mut self, dt: f32, rotation_speed: f32) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.rotation = (self.rotation + rotation_speed * dt) % std::f32::consts::TAU;
        self.pos.y = lerp(self.start_y, self.end_y, self.elapsed / self.duration);
        self.elapsed >= self.duration
    }
}

/// Complete game state for one game
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed this game was created from
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub field: PlayField,
    pub phase: GamePhase,
    pub score: u32,
    pub paddle: Paddle,
    /// Blocks currently falling (sorted by id)
    pub blocks: Vec<FallingBlock>,
    pub main_label: Option<MainLabel>,
    /// Seconds until the next spawn; armed by the first touch
    pub spawn_timer: Option<f32>,
    /// Seconds until the fresh game; armed by game over
    pub restart_timer: Option<f32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning, field: PlayField) -> Self {
        let paddle_pos = Vec2::new(field.mid_x(), tuning.paddle_y(&field));
        let paddle = Paddle::new(paddle_pos, tuning.paddle_size);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            field,
            phase: GamePhase::Init,
            score: 0,
            paddle,
            blocks: Vec::new(),
            main_label: Some(MainLabel::Start),
            spawn_timer: None,
            restart_timer: None,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// The game has started and the paddle responds to input
    pub fn is_alive(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Terminal phase; input is ignored until the restart
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seed for the game that replaces this one
    pub fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    /// Leave `Init`: hide the start label and arm the spawn timer
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Init {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.main_label = None;
        self.spawn_timer = Some(self.tuning.spawn_interval);
        log::info!("Game started (seed {})", self.seed);
        true
    }

    /// Move the paddle to a touch x, if the game is running
    pub fn move_player_to(&mut self, x: f32) {
        if !self.is_alive() {
            self.move_player_off_screen();
            return;
        }
        self.paddle.pos.x = if self.tuning.clamp_paddle {
            x.clamp(self.field.min.x, self.field.max.x)
        } else {
            x
        };
    }

    /// Park the paddle left of the visible field unless the game is running
    pub fn move_player_off_screen(&mut self) {
        if !self.is_alive() {
            self.paddle.pos.x = self.field.min.x - self.paddle.size.x;
        }
    }

    /// Pin the paddle to its resting height
    pub fn set_player_y_position(&mut self) {
        self.paddle.pos.y = self.tuning.paddle_y(&self.field);
    }

    /// Cycle the paddle color
    pub fn change_player_color(&mut self) -> Swatch {
        self.paddle.selection = self.paddle.selection.next();
        self.paddle.selection
    }

    /// Spawn a block of random color at a random x along the top edge
    pub fn spawn_falling_block(&mut self) -> Option<&FallingBlock> {
        let (lo, hi) = self.tuning.spawn_range(&self.field);
        if lo >= hi {
            log::warn!("Play field too narrow to spawn blocks ({}..{})", lo, hi);
            return None;
        }
        let x = self.rng.random_range(lo..hi) as f32;
        let color = Swatch::from_index(self.rng.random_range(0..SWATCH_COUNT)).unwrap_or_default();
        let id = self.next_entity_id();
        let start_y = self.field.max.y;

        self.blocks.push(FallingBlock {
            id,
            pos: Vec2::new(x, start_y),
            size: Vec2::splat(self.tuning.block_size),
            color,
            rotation: 0.0,
            start_y,
            end_y: self.field.min.y - self.tuning.exit_depth,
            elapsed: 0.0,
            duration: self.tuning.fall_duration,
            active: true,
        });
        self.blocks.last()
    }

    /// Remove a block; returns it if it existed
    pub fn remove_block(&mut self, id: u32) -> Option<FallingBlock> {
        let idx = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(idx))
    }

    /// Destroy the paddle and start the restart countdown
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.paddle.alive = false;
        self.main_label = Some(MainLabel::GameOver);
        self.spawn_timer = None;
        self.restart_timer = Some(self.tuning.restart_delay);
        log::info!("Game over with score {}", self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn narrow_state() -> GameState {
        GameState::new(7, Tuning::default(), PlayField::from_size(50.0, 600.0))
    }

    #[test]
    fn test_new_game_defaults() {
        let state = GameState::new(1, Tuning::default(), PlayField::default());
        assert_eq!(state.score, 0);
        assert!(!state.is_alive());
        assert!(!state.is_game_over());
        assert_eq!(state.main_label, Some(MainLabel::Start));
        assert!(state.paddle.alive);
        assert_eq!(state.paddle.selection, Swatch::White);
        assert!(state.spawn_timer.is_none());
    }

    #[test]
    fn test_change_player_color_cycle() {
        let mut state = narrow_state();
        assert_eq!(state.change_player_color(), Swatch::Orange);
        assert_eq!(state.change_player_color(), Swatch::Blue);
        assert_eq!(state.change_player_color(), Swatch::White);
    }

    #[test]
    fn test_move_player_off_screen_alive() {
        let mut state = narrow_state();
        state.start();
        state.paddle.pos.x = 50.0;
        state.move_player_off_screen();
        assert_eq!(state.paddle.pos.x, 50.0);
    }

    #[test]
    fn test_move_player_off_screen_not_alive() {
        let mut state = narrow_state();
        state.paddle.pos.x = 50.0;
        state.move_player_off_screen();
        assert!(state.paddle.pos.x < state.field.min.x);
    }

    #[test]
    fn test_set_player_y_position() {
        let mut state = narrow_state();
        state.paddle.pos.y = 5.0;
        state.set_player_y_position();
        assert_eq!(state.paddle.pos.y, state.tuning.paddle_y(&state.field));
    }

    #[test]
    fn test_spawned_block_is_tagged_falling() {
        let mut state = narrow_state();
        let paddle_category = state.paddle.body().category;
        let block = state.spawn_falling_block().expect("spawned");
        assert_eq!(block.body().category, Category::FallingBlock);
        assert_ne!(block.body().category, paddle_category);
        assert_eq!(block.pos.y, 600.0);
        assert!(block.active);
    }

    #[test]
    fn test_spawn_skipped_on_degenerate_field() {
        let mut state = GameState::new(7, Tuning::default(), PlayField::from_size(20.0, 600.0));
        assert!(state.spawn_falling_block().is_none());
        assert!(state.blocks.is_empty());
    }

    #[test]
    fn test_block_descent_reaches_end() {
        let mut state = narrow_state();
        let id = state.spawn_falling_block().expect("spawned").id;
        let block = state.blocks.iter_mut().find(|b| b.id == id).unwrap();

        assert!(!block.advance(1.25, 2.0));
        assert!((block.pos.y - lerp(600.0, -200.0, 0.5)).abs() < 0.001);
        assert!((block.rotation - 2.5).abs() < 0.001);

        assert!(block.advance(1.25, 2.0));
        assert!((block.pos.y - (-200.0)).abs() < 0.001);
    }

    #[test]
    fn test_game_over_invariant() {
        let mut state = narrow_state();
        state.start();
        state.game_over();
        assert!(state.is_game_over());
        assert!(!state.is_alive());
        assert!(!state.paddle.alive);
        assert_eq!(state.main_label, Some(MainLabel::GameOver));
        assert_eq!(state.restart_timer, Some(3.0));
        assert!(!state.start(), "game over must not go straight back to playing");
    }

    proptest! {
        #[test]
        fn prop_three_cycles_return_to_start(index in 0u8..3) {
            let start = Swatch::from_index(index).unwrap();
            prop_assert_eq!(start.next().next().next(), start);
        }

        #[test]
        fn prop_spawn_x_within_margin(seed in any::<u64>()) {
            let mut state = GameState::new(seed, Tuning::default(), PlayField::from_size(50.0, 600.0));
            let block = state.spawn_falling_block().unwrap();
            prop_assert!(block.pos.x >= 16.0 && block.pos.x < 34.0);
            prop_assert_eq!(block.pos.x.fract(), 0.0);
        }
    }
}
