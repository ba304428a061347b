//! Headless Vampire Match runner (default binary).
//!
//! Auto-plays one seeded session and prints a JSON summary to stdout.
//! Logs go to stderr, filtered by `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vampire_match::core::{Engine, EngineConfig};
use vampire_match::sim::{run_session, SimOptions};

/// Auto-play a match-3 session and report how it went.
#[derive(Debug, Parser)]
#[command(name = "vampire-match", version)]
struct Args {
    /// JSON file with engine settings. Missing fields take their defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// RNG seed. Overrides the config file and VAMPIRE_MATCH_SEED.
    #[arg(short, long)]
    seed: Option<u32>,

    /// Board width in cells.
    #[arg(long, value_name = "COLS")]
    width: Option<u8>,

    /// Board height in cells.
    #[arg(long, value_name = "ROWS")]
    height: Option<u8>,

    /// Moves available for the session.
    #[arg(long, value_name = "N")]
    moves: Option<u32>,

    /// Number of tile colors in play (3 or 4).
    #[arg(long, value_name = "N")]
    colors: Option<u8>,

    /// Seconds of blood growth simulated between moves.
    #[arg(long, default_value = "1.0", value_name = "SECS")]
    seconds_per_move: f32,

    /// Stop after this many moves even if the game is still running.
    #[arg(long, default_value = "1000", value_name = "N")]
    max_steps: u32,

    /// Print every engine event as a JSON line before the summary.
    #[arg(long)]
    events: bool,

    /// Print the final board snapshot as JSON after the summary.
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    config.validate().context("invalid engine configuration")?;

    let mut engine = Engine::new(config).context("failed to start engine")?;
    let opts = SimOptions {
        seconds_per_move: args.seconds_per_move,
        max_steps: args.max_steps,
    };

    let mut write_error = None;
    let summary = run_session(&mut engine, &opts, |event| {
        if !args.events || write_error.is_some() {
            return;
        }
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => write_error = Some(e),
        }
    });
    if let Some(e) = write_error {
        return Err(e).context("failed to encode event");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to encode summary")?
    );
    if args.snapshot {
        println!(
            "{}",
            serde_json::to_string_pretty(&engine.snapshot()).context("failed to encode snapshot")?
        );
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<EngineConfig>(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => EngineConfig::default(),
    }
    .with_env_overrides();

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(moves) = args.moves {
        config.total_moves = moves;
    }
    if let Some(colors) = args.colors {
        config.color_count = colors;
    }
    Ok(config)
}
