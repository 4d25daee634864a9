//! Engine rejections.

use crate::phase::Phase;
use crate::player::PlayerId;
use derive_more::{Display, Error};

/// Why the engine refused an operation.
///
/// Every variant is recoverable: the engine state is untouched and the
/// caller may retry with different input or wait for its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// All four seats are taken.
    #[display("Game already has four players")]
    CapacityExceeded,
    /// No player is seated at this index.
    #[display("No player is seated at {_0}")]
    UnknownPlayer(#[error(not(source))] PlayerId),
    /// Someone other than the current player tried to act.
    #[display("Not your turn, waiting for player {current}")]
    NotCurrentPlayer {
        /// Player whose turn it is.
        current: PlayerId,
    },
    /// The operation does not fit the current phase.
    #[display("Action not allowed while {phase}")]
    WrongPhase {
        /// Phase at the time of the call.
        phase: Phase,
    },
    /// Piece index outside 0-3.
    #[display("Piece index {_0} is out of range (must be 0-3)")]
    InvalidPieceIndex(#[error(not(source))] usize),
    /// A piece can only leave base on a six.
    #[display("A piece can only leave base on a six, rolled {roll}")]
    IllegalSpawn {
        /// The roll that was offered.
        roll: u8,
    },
    /// The move would carry the piece past home.
    #[display("Moving {roll} would overshoot home")]
    Overshoot {
        /// The roll that was offered.
        roll: u8,
    },
    /// Progress outside base..=home.
    #[display("Progress {_0} is outside base..=home")]
    ProgressOutOfRange(#[error(not(source))] i8),
    /// An opponent holds the unsafe square a piece was placed on.
    #[display("Square {square} is held by player {occupant}")]
    SquareTaken {
        /// Global track index.
        square: usize,
        /// Player already standing there.
        occupant: PlayerId,
    },
    /// The piece has already finished.
    #[display("Piece {_0} is already home")]
    PieceAlreadyHome(#[error(not(source))] usize),
}
