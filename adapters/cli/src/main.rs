#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Breachline strategy turn against a board snapshot.

mod action_frame;
mod board_snapshot;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use breachline_system_strategy::{Strategy, StrategyConfig};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::prelude::*;

use board_snapshot::BoardSnapshot;

#[derive(Debug, Parser)]
#[command(name = "breachline", about = "Plan a tower-defence turn from a board snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay action frames, run one turn and print the report
    Turn {
        /// JSON board snapshot
        #[arg(long)]
        board: PathBuf,

        /// Action frames recorded since the game started, one JSON object per line
        #[arg(long)]
        frames: Option<PathBuf>,

        /// TOML strategy table; the built-in starter table is used when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the built-in strategy table as TOML
    StarterConfig,
}

/// Entry point for the Breachline command-line interface.
fn main() -> Result<()> {
    install_tracing();

    match Cli::parse().command {
        Commands::Turn {
            board,
            frames,
            config,
        } => run_turn(&board, frames.as_deref(), config.as_deref()),
        Commands::StarterConfig => {
            print!("{}", StrategyConfig::starter().to_toml_string()?);
            Ok(())
        }
    }
}

fn install_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_turn(
    board: &Path,
    frames: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let config = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read strategy table {}", path.display()))?;
            StrategyConfig::from_toml_str(&text)
                .with_context(|| format!("invalid strategy table {}", path.display()))?
        }
        None => StrategyConfig::starter(),
    };
    let mut strategy = Strategy::new(config)?;
    strategy.on_game_start();

    if let Some(path) = frames {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read action frames {}", path.display()))?;
        let mut recorded = 0;
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let events = action_frame::decode(line).with_context(|| {
                format!("invalid action frame on line {} of {}", number + 1, path.display())
            })?;
            recorded += strategy.on_action_frame(&events);
        }
        info!(recorded, "action frames replayed");
    }

    let text = fs::read_to_string(board)
        .with_context(|| format!("failed to read board snapshot {}", board.display()))?;
    let mut world = BoardSnapshot::from_json(&text)
        .with_context(|| format!("invalid board snapshot {}", board.display()))?
        .into_world();

    let report = strategy.on_turn(&mut world);
    println!("{report}");
    Ok(())
}
