//! Tile Snake headless demo
//!
//! Drives a seeded run at 60 fps with a scripted input timeline and logs
//! what happened. Run with `RUST_LOG=debug` to see each meal.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use tile_snake::sim::Direction;
    use tile_snake::{GameRun, RawInput, SeededRandom, Settings};

    env_logger::init();
    log::info!("Tile Snake (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    let settings = Settings::default();
    let mut run = match GameRun::new(&settings, SeededRandom::new(seed)) {
        Ok(run) => run,
        Err(e) => {
            log::error!("invalid settings: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Game initialized with seed: {}", seed);

    // (frame, input) pairs; a small square walk from every device
    let key = |code: &str| RawInput::KeyDown(code.to_string());
    let release = |code: &str| RawInput::KeyUp(code.to_string());
    let script: Vec<(u32, RawInput)> = vec![
        (30, key("ArrowDown")),
        (32, release("ArrowDown")),
        (90, RawInput::PointerDown {
            id: 1,
            pos: Vec2::new(200.0, 200.0),
            time_ms: 1500.0,
        }),
        (96, RawInput::PointerUp {
            id: 1,
            pos: Vec2::new(140.0, 205.0),
            time_ms: 1600.0,
        }),
        (150, RawInput::Button(Direction::Up)),
        (210, key("KeyD")),
        (212, release("KeyD")),
    ];

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60;

    let mut steps = 0;
    let mut meals = 0;
    let mut frame = 0;
    while frame < MAX_FRAMES && run.is_running() {
        for (_, input) in script.iter().filter(|(at, _)| *at == frame) {
            run.handle_input(input);
        }
        let now = f64::from(frame) * FRAME_MS;
        let report = run.frame(now, FRAME_MS);
        steps += report.steps;
        meals += report
            .events
            .iter()
            .filter(|e| matches!(e, tile_snake::sim::StepEvent::Ate { .. }))
            .count();
        frame += 1;
    }

    let state = run.state();
    log::info!(
        "finished after {} frames, {} steps: score {}, length {}, {} meals, {}",
        frame,
        steps,
        state.score,
        state.len(),
        meals,
        if state.terminal { "game over" } else { "still alive" }
    );
    run.stop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm; nothing to run here
}
