//! Game phases of the turn state machine.

use serde::{Deserialize, Serialize};

/// Where the game is in its turn cycle.
///
/// ```text
/// WaitingForPlayers -> WaitingForRoll <-> WaitingForMove -> GameOver
/// ```
///
/// `GameOver` is left only through an explicit reset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fewer than two players have joined.
    WaitingForPlayers,
    /// The current player must roll.
    WaitingForRoll,
    /// The current player must spend the last roll on a piece.
    WaitingForMove,
    /// Someone has brought all four pieces home.
    GameOver,
}

impl Phase {
    /// True while turns are being played.
    pub fn is_in_progress(self) -> bool {
        matches!(self, Phase::WaitingForRoll | Phase::WaitingForMove)
    }
}
