//! Ludo - unified CLI
//!
//! Serves games over HTTP or runs headless bot simulations.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use ludo_server::{ServerConfig, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ludo_server=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            config,
            seed,
            bot,
        } => {
            let base = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            };
            let config = base.with_overrides(host, port, seed, bot);
            info!(host = %config.host(), port = config.port(), "Starting Ludo server on HTTP");
            ludo_server::serve(config).await
        }
        Command::Simulate {
            games,
            seats,
            seed,
            bot,
        } => run_simulation(Simulation {
            games,
            seats,
            seed,
            bot,
        }),
    }
}

/// Runs the bot simulation and prints a summary.
fn run_simulation(simulation: Simulation) -> Result<()> {
    let report = simulation.run()?;

    println!("Games played:   {}", report.games());
    for (seat, wins) in report.wins().iter().enumerate() {
        println!("Seat {} wins:    {}", seat, wins);
    }
    println!("Unfinished:     {}", report.unfinished());
    println!("Mean actions:   {:.1}", report.mean_actions());
    println!("Longest game:   {}", report.longest_game());
    println!("Elapsed:        {:.3}s", report.elapsed().as_secs_f64());
    Ok(())
}
