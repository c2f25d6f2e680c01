mod app;
mod display;
mod settings;
mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nback_engine::{JsonHighScoreStore, build_sequence, export_results};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

use app::App;
use settings::GameArgs;

#[derive(Parser)]
#[command(name = "nback", version, about = "N-back working memory trainer")]
struct Cli {
    /// TOML file with game settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long, global = true, default_value = "nback_highscore.json")]
    high_score_file: PathBuf,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play {
        #[command(flatten)]
        game: GameArgs,

        /// Write per-round results as JSON
        #[arg(long)]
        results: Option<PathBuf>,
    },

    /// Run a game instantly with a scripted player
    Simulate {
        #[command(flatten)]
        game: GameArgs,

        /// Probability of answering a channel correctly
        #[arg(long, default_value = "0.8")]
        accuracy: f64,

        #[arg(long, default_value = "0")]
        seed: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Write per-round results as JSON
        #[arg(long)]
        results: Option<PathBuf>,
    },

    /// Print a generated stimulus sequence
    Sequence {
        #[command(flatten)]
        game: GameArgs,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the built-in default.
    let default = if cli.verbose { "nback=debug" } else { "nback=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Play { game, results } => {
            let config = settings::resolve(config_path, &game)?;
            let store = JsonHighScoreStore::new(&cli.high_score_file);
            App::new(config, Box::new(store), results)?.run()
        }
        Commands::Simulate {
            game,
            accuracy,
            seed,
            json,
            results,
        } => {
            let config = settings::resolve(config_path, &game)?;
            let mut store = JsonHighScoreStore::new(&cli.high_score_file);
            let report = simulate::run(&config, accuracy, seed, &mut store)?;
            if let Some(path) = results {
                export_results(&path, &report.rounds)?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", display::summary(&report.summary, report.high_score));
                if report.new_high_score {
                    println!("New high score!");
                }
            }
            Ok(())
        }
        Commands::Sequence { game, seed } => {
            let config = settings::resolve(config_path, &game)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let sequence = build_sequence(&mut rng, &config)?;
            let line: Vec<String> = sequence.iter().map(ToString::to_string).collect();
            println!("{}", line.join(" "));
            Ok(())
        }
    }
}
