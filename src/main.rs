//! Sky Runner headless runner
//!
//! Plays the configured session with a scripted autopilot and prints a JSON
//! summary. Usage: `sky-runner [settings.json]`

use serde::Serialize;

use sky_runner::Settings;
use sky_runner::session::Session;
use sky_runner::sim::{GameEvent, GamePhase, TickInput};

/// Run summary printed on exit
#[derive(Debug, Serialize)]
struct Summary {
    ticks: u32,
    phase: GamePhase,
    level: u32,
    level_name: String,
    score: u64,
    lives: u8,
    coins_remaining: usize,
    deaths: u32,
    levels_cleared: u32,
}

/// Hold right, tap jump on a steady rhythm, restart whenever the run ends
fn autopilot(tick: u32, phase: GamePhase) -> TickInput {
    TickInput {
        move_left: false,
        move_right: true,
        jump: tick % 45 < 14,
        restart: !phase.is_simulating() && phase != GamePhase::LevelComplete,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Runner (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut session = match Session::new(&settings) {
        Ok(session) => session,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let mut deaths = 0;
    let mut levels_cleared = 0;
    for t in 0..settings.demo_ticks {
        let input = autopilot(t, session.state().phase);
        for event in session.step(&input) {
            match event {
                GameEvent::PlayerDied { .. } => deaths += 1,
                GameEvent::LevelCleared { .. } => levels_cleared += 1,
                _ => {}
            }
            log::debug!("tick {t}: {event:?}");
        }
    }

    let state = session.state();
    let summary = Summary {
        ticks: settings.demo_ticks,
        phase: state.phase,
        level: state.level.get(),
        level_name: state.world.name.clone(),
        score: state.player.score,
        lives: state.player.lives,
        coins_remaining: state.world.coins_remaining(),
        deaths,
        levels_cleared,
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to encode summary: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `Session` directly on the web
}
