//! Read-only views of a game for transports and front-ends.

use crate::phase::Phase;
use crate::player::{Color, Player, PlayerId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One piece as seen from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PieceView {
    /// Board row derived from progress.
    row: i8,
    /// Board column derived from progress.
    col: i8,
    /// Raw progress value (-1 for base, 57 for home).
    progress: i8,
    /// Whether the piece has arrived home.
    home: bool,
}

impl PieceView {
    pub(crate) fn new(row: i8, col: i8, progress: i8, home: bool) -> Self {
        Self {
            row,
            col,
            progress,
            home,
        }
    }
}

/// One player as seen from outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerView {
    /// Seat index.
    id: PlayerId,
    /// Display name.
    name: String,
    /// Piece color.
    color: Color,
    /// CSS hex value of the color.
    hex: String,
    /// Whether a bot plays this seat.
    is_bot: bool,
    /// Pieces in slot order.
    pieces: Vec<PieceView>,
    /// Pieces still waiting in base.
    in_base: usize,
    /// Pieces out on the shared track.
    on_track: usize,
    /// Pieces that have arrived home.
    home: usize,
}

impl PlayerView {
    pub(crate) fn new(player: &Player, pieces: Vec<PieceView>) -> Self {
        Self {
            id: *player.id(),
            name: player.name().clone(),
            color: *player.color(),
            hex: player.color().hex().to_string(),
            is_bot: *player.is_bot(),
            pieces,
            in_base: player.pieces_in_base(),
            on_track: player.pieces().iter().filter(|p| p.is_on_track()).count(),
            home: player.pieces_home(),
        }
    }
}

/// Complete point-in-time view of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameSnapshot {
    /// Seat index of the player to act.
    current_turn: PlayerId,
    /// Most recent roll, if any.
    last_roll: Option<u8>,
    /// Turn-cycle phase.
    phase: Phase,
    /// Winner once the game is over.
    winner: Option<PlayerId>,
    /// Pieces the current player may move with the pending roll.
    legal_moves: Vec<usize>,
    /// Every seated player.
    players: Vec<PlayerView>,
}

impl GameSnapshot {
    pub(crate) fn new(
        current_turn: PlayerId,
        last_roll: Option<u8>,
        phase: Phase,
        winner: Option<PlayerId>,
        legal_moves: Vec<usize>,
        players: Vec<PlayerView>,
    ) -> Self {
        Self {
            current_turn,
            last_roll,
            phase,
            winner,
            legal_moves,
            players,
        }
    }
}
