//! Bot strategies and the loop that plays bot seats.
//!
//! The engine does not know who chooses moves. Seats flagged as bots are
//! played here: the session asks a [`BotStrategy`] which legal piece to move
//! whenever a bot is to act.

use ludo_core::{
    Game, GameError, Phase, PlayerId, Progress, coordinate_for, global_index, is_safe_square,
};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, instrument, warn};

/// Upper bound on consecutive bot actions in one drive.
///
/// A full four-bot game takes a few hundred actions, so hitting this means
/// something is wrong.
pub const MAX_BOT_ACTIONS: usize = 20_000;

/// Chooses which piece a bot moves.
pub trait BotStrategy: Send + Sync + std::fmt::Debug {
    /// Picks one of `legal` for `player` to move `roll` steps.
    ///
    /// `legal` is never empty.
    fn choose_piece(&self, game: &Game, player: PlayerId, roll: u8, legal: &[usize]) -> usize;
}

/// Moves the first legal piece.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMoveBot;

impl BotStrategy for FirstMoveBot {
    fn choose_piece(&self, _game: &Game, _player: PlayerId, _roll: u8, legal: &[usize]) -> usize {
        legal[0]
    }
}

/// Prefers captures, then finishing, then slipping off the shared track into
/// the home stretch, then leaving base, then the lead piece.
///
/// Ties go to the lowest piece index.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyBot;

impl GreedyBot {
    fn score(game: &Game, player: PlayerId, piece: usize, roll: u8) -> (u8, i8) {
        let Some(from) = game.player(player).and_then(|p| p.progress(piece)) else {
            return (0, 0);
        };
        let to = if from.is_in_base() {
            Progress::START
        } else {
            from.advanced_by(roll).unwrap_or(from)
        };

        let captures = global_index(player, to).is_some_and(|global| {
            !is_safe_square(coordinate_for(player, to))
                && game
                    .occupancy()
                    .square(global)
                    .players()
                    .any(|other| other != player)
        });

        let escapes = from.is_on_track() && !to.is_on_track() && !to.is_home();

        let category = if captures {
            5
        } else if to.is_home() {
            4
        } else if escapes {
            3
        } else if from.is_in_base() {
            2
        } else {
            1
        };
        (category, from.value())
    }
}

impl BotStrategy for GreedyBot {
    fn choose_piece(&self, game: &Game, player: PlayerId, roll: u8, legal: &[usize]) -> usize {
        legal
            .iter()
            .copied()
            .max_by_key(|piece| (Self::score(game, player, *piece, roll), Reverse(*piece)))
            .unwrap_or(legal[0])
    }
}

/// Strategy selectable from config or the command line.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BotKind {
    /// [`FirstMoveBot`].
    First,
    /// [`GreedyBot`].
    #[default]
    Greedy,
}

impl BotKind {
    /// Instantiates the strategy.
    pub fn strategy(self) -> Box<dyn BotStrategy> {
        match self {
            BotKind::First => Box::new(FirstMoveBot),
            BotKind::Greedy => Box::new(GreedyBot),
        }
    }
}

/// Plays consecutive bot turns until a human must act or the game ends.
///
/// Returns the number of engine actions taken (rolls plus moves).
///
/// # Errors
///
/// Propagates engine rejections, which indicate a strategy picked an
/// illegal piece.
#[instrument(skip(game, strategy), fields(phase = %game.phase()))]
pub fn play_bot_turns(game: &mut Game, strategy: &dyn BotStrategy) -> Result<usize, GameError> {
    let mut actions = 0;

    while game.phase().is_in_progress() {
        let current = game.current_player();
        let is_bot = game.player(current).is_some_and(|p| *p.is_bot());
        if !is_bot {
            break;
        }
        if actions >= MAX_BOT_ACTIONS {
            warn!(actions, "Bot action limit reached");
            break;
        }

        match game.phase() {
            Phase::WaitingForRoll => {
                let roll = game.roll_dice(current)?;
                debug!(player = current, roll = roll.value(), forfeited = roll.is_forfeited(), "Bot rolled");
            }
            Phase::WaitingForMove => {
                let roll = game.last_roll().unwrap_or_default();
                let legal = game.legal_moves(current, roll);
                if legal.is_empty() {
                    warn!(player = current, roll, "Bot has no legal move");
                    break;
                }
                let piece = strategy.choose_piece(game, current, roll, &legal);
                game.make_move(current, piece)?;
                debug!(player = current, piece, roll, "Bot moved");
            }
            _ => break,
        }
        actions += 1;
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo_core::{Color, PlayerSpec, ScriptedDice};

    fn bot_vs_human(rolls: impl IntoIterator<Item = u8>) -> Game {
        let mut game = Game::with_dice(ScriptedDice::new(rolls));
        game.add_player(PlayerSpec::bot("Bot", Color::Green)).unwrap();
        game.add_player(PlayerSpec::human("Ann", Color::Red)).unwrap();
        game
    }

    #[test]
    fn test_greedy_prefers_capture() {
        let mut game = bot_vs_human([3]);
        game.place_piece(0, 0, Progress::new(30)).unwrap();
        game.place_piece(0, 1, Progress::new(7)).unwrap();
        game.place_piece(1, 0, Progress::new(49)).unwrap();

        let choice = GreedyBot.choose_piece(&game, 0, 3, &[0, 1]);
        assert_eq!(choice, 1);
    }

    #[test]
    fn test_greedy_prefers_finishing_over_advancing() {
        let mut game = bot_vs_human([2]);
        game.place_piece(0, 0, Progress::new(20)).unwrap();
        game.place_piece(0, 1, Progress::new(55)).unwrap();

        assert_eq!(GreedyBot.choose_piece(&game, 0, 2, &[0, 1]), 1);
    }

    #[test]
    fn test_greedy_spawns_on_six() {
        let mut game = bot_vs_human([6]);
        game.place_piece(0, 0, Progress::new(20)).unwrap();

        assert_eq!(GreedyBot.choose_piece(&game, 0, 6, &[0, 1, 2, 3]), 1);
    }

    #[test]
    fn test_greedy_escapes_into_home_stretch() {
        let mut game = bot_vs_human([6]);
        game.place_piece(0, 0, Progress::new(47)).unwrap();

        // 47 + 6 leaves the shared track, which beats bringing out a new piece.
        assert_eq!(GreedyBot.choose_piece(&game, 0, 6, &[0, 1, 2, 3]), 0);
    }

    #[test]
    fn test_first_move_bot_takes_first() {
        let game = bot_vs_human([6]);
        assert_eq!(FirstMoveBot.choose_piece(&game, 0, 6, &[2, 3]), 2);
    }

    #[test]
    fn test_bot_turns_stop_at_human() {
        let mut game = bot_vs_human([6, 4]);
        let actions = play_bot_turns(&mut game, &GreedyBot).unwrap();

        // roll 6, spawn, roll 4, advance
        assert_eq!(actions, 4);
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.phase(), Phase::WaitingForRoll);
        assert_eq!(game.player(0).unwrap().progress(0), Some(Progress::new(4)));
    }

    #[test]
    fn test_bot_turns_do_nothing_for_human() {
        let mut game = Game::with_dice(ScriptedDice::new([6]));
        game.add_player(PlayerSpec::human("Ann", Color::Green)).unwrap();
        game.add_player(PlayerSpec::bot("Bot", Color::Red)).unwrap();
        assert_eq!(play_bot_turns(&mut game, &FirstMoveBot).unwrap(), 0);
    }

    #[test]
    fn test_all_bot_game_finishes() {
        let mut game = Game::seeded(11);
        for color in [Color::Green, Color::Red, Color::Blue, Color::Yellow] {
            game.add_player(PlayerSpec::bot(color.to_string(), color)).unwrap();
        }
        play_bot_turns(&mut game, &GreedyBot).unwrap();
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(game.winner().is_some());
    }

    #[test]
    fn test_bot_kind_parses() {
        assert_eq!("first".parse::<BotKind>().unwrap(), BotKind::First);
        assert_eq!(BotKind::default().to_string(), "greedy");
    }
}
