//! Host-facing game loop
//!
//! The host forwards frame and touch events here. Frame time is accumulated
//! and consumed in fixed `SIM_DT` steps; game over is followed by a timed
//! restart that installs a brand new `GameState` and cross-fades to it.

use crate::PlayField;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{self, GameEvent, GamePhase, GameState, TickInput};
use crate::tuning::{Tuning, TuningError};
use crate::ui::{Palette, SceneView, Strings};

/// One running game session, across restarts
pub struct GameLoop {
    state: GameState,
    tuning: Tuning,
    field: PlayField,
    strings: Strings,
    palette: Palette,
    input: TickInput,
    accumulator: f32,
    /// Seconds into the restart cross-fade, if one is running
    crossfade: Option<f32>,
    best_score: u32,
    games_played: u32,
    last_phase: GamePhase,
}

impl GameLoop {
    pub fn new(seed: u64, tuning: Tuning, field: PlayField) -> Result<Self, TuningError> {
        tuning.validate()?;
        tuning.check_field(&field)?;
        log::info!("Game loop initialized with seed: {}", seed);
        Ok(Self {
            state: GameState::new(seed, tuning.clone(), field),
            tuning,
            field,
            strings: Strings::default(),
            palette: Palette::default(),
            input: TickInput::default(),
            accumulator: 0.0,
            crossfade: None,
            best_score: 0,
            games_played: 0,
            last_phase: GamePhase::Init,
        })
    }

    /// Replace the label text (localization)
    pub fn with_strings(mut self, strings: Strings) -> Self {
        self.strings = strings;
        self
    }

    /// Scene became visible: start over from a fresh game
    pub fn on_init(&mut self) {
        let seed = self.state.next_seed();
        self.install(seed);
    }

    /// Play field changed size; rejected if blocks could no longer spawn
    pub fn on_resize(&mut self, field: PlayField) -> Result<(), TuningError> {
        self.tuning.check_field(&field)?;
        self.field = field;
        self.state.field = field;
        Ok(())
    }

    /// Advance by a frame's worth of time
    pub fn on_tick(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        if let Some(elapsed) = self.crossfade {
            let elapsed = elapsed + dt;
            self.crossfade = (elapsed < self.tuning.crossfade_duration).then_some(elapsed);
        }

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(sim::tick(&mut self.state, &self.input, SIM_DT));
            self.accumulator -= SIM_DT;
            substeps += 1;

            if self.state.restart_timer.is_some_and(|t| t <= 0.0) {
                self.restart();
                events.push(GameEvent::Restarted);
            }
        }
        // Drop time we could not simulate rather than building a backlog
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.observe(&events);
        events
    }

    pub fn on_touch_down(&mut self, x: f32) -> Vec<GameEvent> {
        let events = sim::touch_down(&mut self.state, x);
        self.observe(&events);
        events
    }

    pub fn on_touch_move(&mut self, x: f32) {
        sim::touch_move(&mut self.state, x);
    }

    pub fn on_touch_up(&mut self) -> Vec<GameEvent> {
        let events = sim::touch_up(&mut self.state);
        self.observe(&events);
        events
    }

    /// Let the built-in autopilot play
    pub fn set_idle_mode(&mut self, idle: bool) {
        if self.input.idle_mode != idle {
            log::info!("Idle mode: {}", idle);
        }
        self.input.idle_mode = idle;
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> SceneView {
        let fade = match self.crossfade {
            Some(elapsed) if self.tuning.crossfade_duration > 0.0 => {
                (elapsed / self.tuning.crossfade_duration).clamp(0.0, 1.0)
            }
            _ => 1.0,
        };
        SceneView::capture(&self.state, &self.strings, &self.palette, fade)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Highest score reached this session, including the game in progress
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Number of games that ended in game over
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    fn restart(&mut self) {
        let seed = self.state.next_seed();
        self.install(seed);
        self.crossfade = Some(0.0);
    }

    fn install(&mut self, seed: u64) {
        self.record_best();
        self.state = GameState::new(seed, self.tuning.clone(), self.field);
        self.accumulator = 0.0;
        self.last_phase = GamePhase::Init;
        log::info!("New game with seed: {}", seed);
    }

    fn observe(&mut self, events: &[GameEvent]) {
        for event in events {
            log::debug!("{:?}", event);
            if matches!(event, GameEvent::GameOver { .. }) {
                self.games_played += 1;
            }
        }
        self.record_best();
        if self.state.phase != self.last_phase {
            log::info!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
            self.last_phase = self.state.phase;
        }
    }

    fn record_best(&mut self) {
        if self.state.score > self.best_score {
            log::debug!("New session best: {}", self.state.score);
            self.best_score = self.state.score;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Body, Category, FallingBlock, Swatch};
    use glam::Vec2;

    fn new_loop() -> GameLoop {
        GameLoop::new(42, Tuning::default(), PlayField::from_size(50.0, 1000.0)).unwrap()
    }

    fn run_for(game: &mut GameLoop, seconds: f32) -> Vec<GameEvent> {
        let frame = 1.0 / 60.0;
        let mut events = Vec::new();
        let mut t = 0.0;
        while t < seconds {
            events.extend(game.on_tick(frame));
            t += frame;
        }
        events
    }

    fn collide(game: &mut GameLoop, color: Swatch) -> Option<GameEvent> {
        let state = game.state_mut();
        let id = state.next_entity_id();
        let pos = state.paddle.pos;
        state.blocks.push(FallingBlock {
            id,
            pos,
            size: Vec2::splat(40.0),
            color,
            rotation: 0.0,
            start_y: pos.y,
            end_y: -200.0,
            elapsed: 0.0,
            duration: 2.5,
            active: true,
        });
        let player = state.paddle.body();
        sim::handle_player_block_collision(state, player, Body::new(Category::FallingBlock, id))
    }

    #[test]
    fn test_rejects_degenerate_field() {
        let result = GameLoop::new(1, Tuning::default(), PlayField::from_size(10.0, 1000.0));
        assert!(matches!(result, Err(TuningError::FieldTooNarrow { .. })));

        let mut game = new_loop();
        assert!(game.on_resize(PlayField::from_size(10.0, 1000.0)).is_err());
        assert_eq!(game.state().field, PlayField::from_size(50.0, 1000.0));
        assert!(game.on_resize(PlayField::from_size(80.0, 900.0)).is_ok());
        assert_eq!(game.state().field.max.x, 80.0);
    }

    #[test]
    fn test_scenario_with_restart() {
        let mut game = new_loop();
        assert_eq!(game.state().score, 0);
        assert!(!game.state().is_alive());
        assert!(!game.state().is_game_over());

        game.on_touch_down(25.0);
        assert!(game.state().is_alive());

        game.on_touch_up();
        assert_eq!(game.state().paddle.selection, Swatch::Orange);
        collide(&mut game, Swatch::Orange);
        assert_eq!(game.state().score, 1);

        let event = collide(&mut game, Swatch::White);
        game.observe(&event.into_iter().collect::<Vec<_>>());
        assert!(game.state().is_game_over());
        assert!(!game.state().is_alive());
        assert_eq!(game.state().score, 1);
        assert_eq!(game.best_score(), 1);

        // Input is ignored until the fresh game is installed
        assert!(game.on_touch_down(25.0).is_empty());
        assert!(!game.state().is_alive());

        let events = run_for(&mut game, 3.1);
        assert!(events.contains(&GameEvent::Restarted));
        assert_eq!(game.state().phase, GamePhase::Init);
        assert_eq!(game.state().score, 0);
        assert!(game.state().paddle.alive);
        assert_eq!(game.games_played(), 1);
        assert_eq!(game.best_score(), 1);
    }

    #[test]
    fn test_crossfade_after_restart() {
        let mut game = new_loop();
        game.on_touch_down(25.0);
        game.state_mut().game_over();
        assert_eq!(game.view().fade, 1.0);

        run_for(&mut game, 3.05);
        let fade = game.view().fade;
        assert!(fade < 1.0, "fade {} should still be running", fade);

        run_for(&mut game, 1.0);
        assert_eq!(game.view().fade, 1.0);
    }

    #[test]
    fn test_old_game_timers_do_not_leak() {
        let mut game = new_loop();
        game.on_touch_down(25.0);
        game.state_mut().game_over();
        run_for(&mut game, 3.1);

        // The fresh game has no running spawn timer until it is touched
        assert!(game.state().spawn_timer.is_none());
        run_for(&mut game, 3.0);
        assert!(game.state().blocks.is_empty());
    }

    #[test]
    fn test_large_frame_is_clamped() {
        let mut game = new_loop();
        game.on_tick(5.0);
        assert!(game.state().time_ticks <= MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_idle_mode_plays() {
        let mut game = new_loop();
        game.set_idle_mode(true);
        run_for(&mut game, 8.0);
        assert!(game.state().is_alive());
        assert!(game.state().score > 0);
    }

    #[test]
    fn test_on_init_resets() {
        let mut game = new_loop();
        game.on_touch_down(25.0);
        game.on_init();
        assert_eq!(game.state().phase, GamePhase::Init);
        assert!(game.view().main_label.is_some());
    }

    #[test]
    fn test_best_score_counts_running_game() {
        let mut game = new_loop();
        game.on_touch_down(25.0);
        collide(&mut game, Swatch::White);
        collide(&mut game, Swatch::White);
        game.on_tick(1.0 / 60.0);
        assert!(game.state().is_alive());
        assert_eq!(game.best_score(), 2);
        assert_eq!(game.games_played(), 0);
    }

    #[test]
    fn test_best_score_survives_on_init() {
        let mut game = new_loop();
        game.on_touch_down(25.0);
        collide(&mut game, Swatch::White);
        game.on_init();
        assert_eq!(game.state().score, 0);
        assert_eq!(game.best_score(), 1);
    }

    #[test]
    fn test_custom_strings_reach_view() {
        let strings = Strings::from_json(
            r#"{ "start": "Los!", "game_over": "Ende", "score_prefix": "Punkte: " }"#,
        )
        .unwrap();
        let mut game = GameLoop::new(7, Tuning::default(), PlayField::from_size(50.0, 1000.0))
            .unwrap()
            .with_strings(strings);

        let view = game.view();
        assert_eq!(view.score_label.text, "Punkte: 0");
        assert_eq!(view.main_label.map(|l| l.text).as_deref(), Some("Los!"));

        game.on_touch_down(25.0);
        collide(&mut game, Swatch::Orange);
        let view = game.view();
        assert_eq!(view.main_label.map(|l| l.text).as_deref(), Some("Ende"));
    }
}
