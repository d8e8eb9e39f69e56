//! Colors to Collect entry point
//!
//! Runs a headless session with the autopilot at the controls and prints the
//! final frame as JSON.
//! Usage: `colors-to-collect [tuning.json] [seconds] [strings.json]`

use colors_to_collect::sim::GameEvent;
use colors_to_collect::ui::Strings;
use colors_to_collect::{GameLoop, PlayField, Tuning};

/// Host frame rate for the headless run
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 60.0;

fn main() {
    env_logger::init();
    log::info!("Colors to Collect (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);
    let strings = args
        .next()
        .map(Strings::load_or_default)
        .unwrap_or_default();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut game = match GameLoop::new(seed, tuning, PlayField::default()) {
        Ok(game) => game.with_strings(strings),
        Err(e) => {
            log::error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };
    game.set_idle_mode(true);

    let frames = (seconds / FRAME_DT).ceil() as u32;
    let (mut caught, mut missed) = (0u32, 0u32);
    for _ in 0..frames {
        for event in game.on_tick(FRAME_DT) {
            match event {
                GameEvent::BlockCaught { .. } => caught += 1,
                GameEvent::BlockMissed { .. } => missed += 1,
                _ => {}
            }
        }
    }

    log::info!(
        "Ran {:.1}s: caught {}, missed {}, best {}, games over {}",
        seconds,
        caught,
        missed,
        game.best_score(),
        game.games_played()
    );

    match serde_json::to_string_pretty(&game.view()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize frame: {}", e),
    }
}
