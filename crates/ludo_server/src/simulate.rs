//! Headless all-bot games for balance checks and throughput numbers.

use crate::bot::{BotKind, play_bot_turns};
use derive_getters::Getters;
use ludo_core::{Color, Game, GameError, MAX_PLAYERS, PlayerSpec};
use serde::Serialize;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Parameters of a simulation run.
#[derive(Debug, Clone, Copy)]
pub struct Simulation {
    /// Number of games to play.
    pub games: u32,
    /// Bot seats per game, 2 to 4.
    pub seats: usize,
    /// Seed of the first game; game `i` uses `seed + i`.
    pub seed: u64,
    /// Strategy for every seat.
    pub bot: BotKind,
}

/// Aggregated results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct SimulationReport {
    games: u32,
    wins: Vec<u32>,
    unfinished: u32,
    total_actions: u64,
    longest_game: usize,
    #[serde(skip)]
    elapsed: Duration,
}

impl SimulationReport {
    /// Mean engine actions per game.
    pub fn mean_actions(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_actions as f64 / f64::from(self.games)
        }
    }
}

impl Simulation {
    /// Plays every game to completion.
    ///
    /// # Errors
    ///
    /// Propagates engine rejections from the bot loop.
    #[instrument(skip(self), fields(games = self.games, seats = self.seats, seed = self.seed, bot = %self.bot))]
    pub fn run(&self) -> Result<SimulationReport, GameError> {
        let seats = self.seats.clamp(2, MAX_PLAYERS);
        if seats != self.seats {
            warn!(requested = self.seats, seats, "Seat count clamped");
        }
        let strategy = self.bot.strategy();
        let started = Instant::now();

        let mut report = SimulationReport {
            games: self.games,
            wins: vec![0; seats],
            unfinished: 0,
            total_actions: 0,
            longest_game: 0,
            elapsed: Duration::ZERO,
        };

        for i in 0..self.games {
            let mut game = Game::seeded(self.seed.wrapping_add(u64::from(i)));
            for color in Color::iter().take(seats) {
                game.add_player(PlayerSpec::bot(color.to_string(), color))?;
            }

            let actions = play_bot_turns(&mut game, strategy.as_ref())?;
            report.total_actions += actions as u64;
            report.longest_game = report.longest_game.max(actions);

            match game.winner() {
                Some(winner) => {
                    report.wins[winner] += 1;
                    debug!(game = i, winner, actions, "Game finished");
                }
                None => {
                    report.unfinished += 1;
                    warn!(game = i, actions, "Game did not finish");
                }
            }
        }

        report.elapsed = started.elapsed();
        info!(
            wins = ?report.wins,
            unfinished = report.unfinished,
            mean_actions = report.mean_actions(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Simulation complete"
        );
        Ok(report)
    }
}
