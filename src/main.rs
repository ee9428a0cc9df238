use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use riverbear::core::config::{load_settings, Settings};
use riverbear::fishing::{Difficulty, FishingGame};
use riverbear::presentation::{ConsoleSink, JsonLinesSink, PresentationSink};
use riverbear::ui::{self, RiverView};
use riverbear::utils::persistence;
use riverbear::{GameError, Result};

#[derive(Parser)]
#[command(name = "riverbear", version, about = "A bear catches fish in a river")]
struct Cli {
    /// Difficulty to start on (easy, medium, hard)
    #[arg(long, short, global = true)]
    difficulty: Option<Difficulty>,

    /// Seed for reproducible rounds
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play in the terminal (default)
    Tui,
    /// Play a single round without a UI, printing events
    Play {
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Serve the game to browsers
    #[cfg(feature = "web")]
    Serve {
        #[arg(long, short)]
        port: Option<u16>,
    },
}

/// Where log output goes.
enum LogTarget {
    /// ~/.riverbear/riverbear.log, keeping the terminal UI clean
    File,
    Stderr,
}

fn init_logging(settings: &Settings, target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::File => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(persistence::log_file()?)?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn make_game<S: PresentationSink>(sink: S, settings: &Settings) -> Result<FishingGame<S>> {
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = FishingGame::new(Arc::new(sink), rng);
    game.select_difficulty(settings.difficulty)?;
    Ok(game)
}

async fn play_headless<S: PresentationSink>(sink: S, settings: &Settings) -> Result<()> {
    let game = make_game(sink, settings)?;
    game.open()?;
    if let Some(result) = game.start_round().await? {
        tracing::info!(verdict = ?result.verdict(), "headless round finished");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings()?;
    if let Some(difficulty) = cli.difficulty {
        settings.difficulty = difficulty;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    let command = cli.command.unwrap_or(Command::Tui);
    let target = match command {
        Command::Tui => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    init_logging(&settings, target)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match command {
            Command::Tui => {
                let game = make_game(RiverView::new(), &settings)?;
                game.open()?;
                ui::run_tui(game).await?;
            }
            Command::Play { json: false } => {
                play_headless(ConsoleSink::stdout(), &settings).await?;
            }
            Command::Play { json: true } => {
                play_headless(JsonLinesSink::stdout(), &settings).await?;
            }
            #[cfg(feature = "web")]
            Command::Serve { port } => {
                let game = make_game(riverbear::web::BroadcastSink::new(), &settings)?;
                game.open()?;
                riverbear::web::serve(game, port.unwrap_or(settings.web_port)).await?;
            }
        }
        Ok::<(), GameError>(())
    })
}
