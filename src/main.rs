//! Cyber Pong headless runner
//!
//! Plays one autopilot match in the terminal and logs the event stream.
//! Usage: `cyber-pong [difficulty] [seed]` (set `RUST_LOG=debug` for more).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cyber_pong::sim::{GameEvent, GamePhase, Match};
    use cyber_pong::{Difficulty, Tuning};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(name) => Difficulty::from_str(&name).unwrap_or_else(|| {
            log::warn!("Unknown difficulty '{name}', using {}", Difficulty::default());
            Difficulty::default()
        }),
        None => Difficulty::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random::<u64>);

    log::info!("Cyber Pong headless match: {difficulty}, seed {seed}");

    // One tick per 60 Hz frame
    const FRAME_MS: f32 = 1000.0 / 60.0;
    const MAX_TICKS: u64 = 60 * 60 * 20;

    let tuning = Tuning::default();
    let ball_size = tuning.ball_size;
    let mut game = Match::new(tuning, seed);
    game.start(difficulty);

    while game.phase() != GamePhase::GameOver && game.ticks() < MAX_TICKS {
        // Autopilot: chase the ball closest to the player's goal
        if let Some(ball) = game
            .balls()
            .iter()
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
        {
            let target = ball.center(ball_size).y;
            game.set_player_target(target);
        }

        game.advance_countdown(FRAME_MS);
        game.tick();

        for event in game.take_events() {
            match event {
                GameEvent::ScoreChanged {
                    side,
                    player_score,
                    ai_score,
                } => {
                    log::info!("Point {side}: {player_score} - {ai_score}");
                }
                GameEvent::PowerUpActivated { kind } => log::info!("{}", kind.label()),
                GameEvent::GameOver(summary) => println!("{}", summary.describe()),
                other => log::debug!("{other:?}"),
            }
        }
    }

    if game.phase() != GamePhase::GameOver {
        log::warn!("Stopped after {MAX_TICKS} ticks without a winner");
        let state = game.state();
        println!(
            "Unfinished: {} - {} (level {}, speed {})",
            state.player_score,
            state.ai_score,
            state.level,
            state.speed_label()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `cyber_pong::sim::Match` directly
}
