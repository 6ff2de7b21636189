//! Emoji quiz server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin guessroom-server
//! cargo run --bin guessroom-server -- --host 0.0.0.0 --port 3000 --dev-mode
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use guessroom_server::{
    config::{GameConfig, MAX_ROUNDS, ROUND_DURATION},
    domain::{MessagePusher, ScoreReporter},
    infrastructure::{
        HttpScoreReporter, LoggingScoreReporter, RandomQuestionPicker, WebSocketMessagePusher,
    },
    ui::Server,
    usecase::Coordinator,
};
use guessroom_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "guessroom-server")]
#[command(about = "Emoji quiz matchmaking and round server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Start a game as soon as one player is waiting
    #[arg(long, env = "DEV_MODE")]
    dev_mode: bool,

    /// Answer window of a round, in seconds
    #[arg(long, default_value_t = ROUND_DURATION.as_secs())]
    round_seconds: u64,

    /// Rounds per game
    #[arg(long, default_value_t = MAX_ROUNDS)]
    max_rounds: u32,

    /// Endpoint receiving final scores as JSON POSTs. Scores are only logged when unset.
    #[arg(long, env = "SCORE_API_URL")]
    score_api_url: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Game config
    // 2. MessagePusher / ScoreReporter / QuestionPicker
    // 3. Coordinator
    // 4. Server

    // 1. Game config
    let config = GameConfig::for_mode(args.dev_mode)
        .with_round_duration(Duration::from_secs(args.round_seconds))
        .with_max_rounds(args.max_rounds);
    if args.dev_mode {
        tracing::info!("Developer mode: games start with {} player", config.min_players);
    }

    // 2. Adapters
    let pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
    let reporter: Arc<dyn ScoreReporter> = match args.score_api_url {
        Some(url) => match HttpScoreReporter::new(url) {
            Ok(reporter) => {
                tracing::info!("Reporting final scores to {}", reporter.endpoint());
                Arc::new(reporter)
            }
            Err(e) => {
                tracing::error!("Failed to set up score reporter: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("No score API configured, final scores are logged only");
            Arc::new(LoggingScoreReporter)
        }
    };
    let picker = Box::new(RandomQuestionPicker::default());

    // 3. Coordinator
    let coordinator = Coordinator::spawn(config, pusher, reporter, picker);

    // 4. Create and run the server
    if let Err(e) = Server::new(coordinator).run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
