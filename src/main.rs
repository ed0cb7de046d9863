use alice_chess::config::EngineConfig;
use alice_chess::engine::{ChessError, Game};

fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alice_chess=info".into()),
        )
        .init();

    let config = EngineConfig::from_env();
    let engine = config.build_engine();

    tracing::info!(
        "alice-chess v{} self-play with {} (depth {}, budget {:?})",
        env!("CARGO_PKG_VERSION"),
        engine.name(),
        config.search_depth,
        config.time_budget,
    );

    let mut game = Game::new();
    println!("{}\n", game.position());

    for _ in 0..config.max_plies {
        let mv = match engine.choose_move(game.position()) {
            Ok(mv) => mv,
            Err(ChessError::NoMoveAvailable(color)) => {
                println!("{color} resigns ({})", game.status());
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "engine failed");
                std::process::exit(1);
            }
        };

        match game.make_move(mv) {
            Ok(announcement) => println!("{announcement}\n{}\n", game.position()),
            Err(e) => {
                tracing::error!(error = %e, "engine chose an unplayable move");
                std::process::exit(1);
            }
        }
    }

    println!("stopped after {} plies ({})", config.max_plies, game.status());
}
