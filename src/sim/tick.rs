//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically, plus the touch
//! handlers that mutate the same state between ticks.

use super::collision::{Body, Category, Contact};
use super::state::{GameEvent, GameState};

/// Per-tick options
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Finger went down at `x`
pub fn touch_down(state: &mut GameState, x: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.is_game_over() {
        return events;
    }
    if state.start() {
        events.push(GameEvent::Started);
    }
    state.move_player_to(x);
    events
}

/// Finger dragged to `x`
pub fn touch_move(state: &mut GameState, x: f32) {
    if state.is_game_over() {
        return;
    }
    state.move_player_to(x);
}

/// Finger lifted: cycle the paddle color
pub fn touch_up(state: &mut GameState) -> Vec<GameEvent> {
    if state.is_game_over() {
        return Vec::new();
    }
    let swatch = state.change_player_color();
    vec![GameEvent::ColorChanged { swatch }]
}

/// Dispatch a contact between two bodies
pub fn handle_contact(state: &mut GameState, contact: Contact) -> Option<GameEvent> {
    let (player, other) = contact.player_first()?;
    handle_player_block_collision(state, player, other)
}

/// Resolve the paddle touching a block: score on a color match, game over otherwise
///
/// Silently does nothing when `player` is not the paddle, `block` is unknown or
/// already resolved, or the game is already over.
pub fn handle_player_block_collision(
    state: &mut GameState,
    player: Body,
    block: Body,
) -> Option<GameEvent> {
    if player.category != Category::Player || block.category != Category::FallingBlock {
        return None;
    }
    if state.is_game_over() || !state.paddle.alive {
        return None;
    }

    let selection = state.paddle.selection;
    let hit = state
        .blocks
        .iter_mut()
        .find(|b| b.id == block.id && b.active)?;
    hit.active = false;

    if hit.color == selection {
        state.score += 1;
        state.remove_block(block.id);
        Some(GameEvent::BlockCaught {
            id: block.id,
            score: state.score,
        })
    } else {
        state.game_over();
        Some(GameEvent::GameOver { score: state.score })
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;
    state.set_player_y_position();

    if input.idle_mode {
        autopilot(state, &mut events);
    }

    // Spawn timer
    let interval = state.tuning.spawn_interval;
    if state.spawn_timer.is_some() && !(interval > 0.0) {
        log::warn!("Spawn interval {} is not positive, spawning disabled", interval);
        state.spawn_timer = None;
    }
    if let Some(mut remaining) = state.spawn_timer {
        remaining -= dt;
        while remaining <= 0.0 {
            if state.is_alive() {
                if let Some(block) = state.spawn_falling_block() {
                    events.push(GameEvent::BlockSpawned {
                        id: block.id,
                        swatch: block.color,
                        x: block.pos.x,
                    });
                }
            }
            remaining += interval;
        }
        state.spawn_timer = Some(remaining);
    }

    // Descent
    let rotation_speed = state.tuning.rotation_speed;
    let mut finished = Vec::new();
    for block in &mut state.blocks {
        if block.advance(dt, rotation_speed) {
            finished.push(block.id);
        }
    }
    for id in finished {
        if let Some(block) = state.remove_block(id) {
            if block.active {
                events.push(GameEvent::BlockMissed { id });
            }
        }
    }

    // Collisions
    if state.is_alive() && state.paddle.alive {
        let paddle_box = state.paddle.aabb();
        let player = state.paddle.body();
        let contacts: Vec<Body> = state
            .blocks
            .iter()
            .filter(|b| b.active && b.aabb().overlaps(&paddle_box))
            .map(|b| b.body())
            .collect();

        for block in contacts {
            if let Some(event) = handle_contact(state, Contact { a: player, b: block }) {
                events.push(event);
            }
            if state.is_game_over() {
                break;
            }
        }
    }

    // Restart countdown
    if let Some(remaining) = state.restart_timer.as_mut() {
        *remaining -= dt;
    }

    events
}

/// Drive the paddle: start the game, chase the lowest block, match its color
fn autopilot(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.is_game_over() {
        return;
    }
    if !state.is_alive() {
        let x = state.field.mid_x();
        events.extend(touch_down(state, x));
        return;
    }

    let paddle_bottom = state.paddle.aabb().min.y;
    let target = state
        .blocks
        .iter()
        .filter(|b| b.active && b.pos.y > paddle_bottom)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|b| (b.pos.x, b.color));

    if let Some((x, color)) = target {
        touch_move(state, x);
        if state.paddle.selection != color {
            events.extend(touch_up(state));
        }
    }
}
