//! Command-line interface for the ludo binary.

use clap::{Parser, Subcommand};
use ludo_server::BotKind;
use std::path::PathBuf;

/// Ludo - session-keyed game server with bot seats
#[derive(Parser, Debug)]
#[command(name = "ludo")]
#[command(about = "Ludo game server and bot simulator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Base dice seed for new games
        #[arg(long)]
        seed: Option<u64>,

        /// Strategy for bot seats
        #[arg(long, value_enum)]
        bot: Option<BotKind>,
    },

    /// Play all-bot games and report the results
    Simulate {
        /// Number of games
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Bot seats per game (2-4)
        #[arg(short, long, default_value = "4")]
        seats: usize,

        /// Seed of the first game
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Strategy for every seat
        #[arg(long, value_enum, default_value = "greedy")]
        bot: BotKind,
    },
}
