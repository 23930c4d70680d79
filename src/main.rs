//! Shark Survivors headless runner
//!
//! Drives the simulation without a renderer: a scripted swim pattern, the
//! first level-up option every time, and an automatic restart on death.
//!
//! Usage: `shark-survivors [settings.json] [ticks]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use shark_survivors::Settings;
    use shark_survivors::consts::TICKS_PER_SECOND;
    use shark_survivors::sim::{GameEvent, GamePhase, GameState, MoveKeys, TickInput, tick};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let total_ticks: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(TICKS_PER_SECOND * 120);

    log::info!(
        "Shark Survivors (headless) starting: seed {}, {} ticks",
        settings.seed,
        total_ticks
    );

    let mut state = GameState::from_settings(&settings);
    let mut runs = 1u32;
    let mut kills = 0u64;

    for frame in 0..total_ticks {
        // Swim a slow square so the world keeps streaming
        let leg = (frame / 240) % 4;
        let movement = MoveKeys {
            right: leg == 0,
            down: leg == 1,
            left: leg == 2,
            up: leg == 3,
        };
        let input = TickInput {
            movement,
            level_up_choice: (state.phase == GamePhase::LevelUp).then_some(0),
            restart: state.phase == GamePhase::GameOver,
            tuning: settings.tuning,
            ..Default::default()
        };
        let was_over = state.is_game_over();
        tick(&mut state, &input);
        if was_over && !state.is_game_over() {
            runs += 1;
        }
        kills += state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
            .count() as u64;
    }

    log::info!(
        "Finished: {} run(s), {} kills, level {}, {} enemies alive",
        runs,
        kills,
        state.player.level,
        state.registry.enemies.len()
    );

    match serde_json::to_string_pretty(&state.hud()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize HUD: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; the host drives `sim::tick` directly
}
