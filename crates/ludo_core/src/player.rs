//! Players and their pieces.

use crate::constants::MAX_PIECES;
use crate::progress::Progress;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Seat index of a player at the table (0-3).
pub type PlayerId = usize;

/// Player colors, in seating order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// First seat.
    Green,
    /// Second seat.
    Red,
    /// Third seat.
    Blue,
    /// Fourth seat.
    Yellow,
}

impl Color {
    /// CSS hex color used by web front-ends.
    pub fn hex(self) -> &'static str {
        match self {
            Color::Green => "#2ecc71",
            Color::Red => "#e74c3c",
            Color::Blue => "#3498db",
            Color::Yellow => "#f1c40f",
        }
    }
}

/// What a caller supplies to seat a new player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PlayerSpec {
    /// Display name.
    name: String,
    /// Piece color.
    color: Color,
    /// Whether a bot strategy plays this seat.
    #[serde(default)]
    is_bot: bool,
}

impl PlayerSpec {
    /// A seat played by a person.
    pub fn human(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            is_bot: false,
        }
    }

    /// A seat played by a bot strategy.
    pub fn bot(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            is_bot: true,
        }
    }
}

/// A seated player with four pieces.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Player {
    /// Seat index.
    id: PlayerId,
    /// Display name.
    name: String,
    /// Piece color.
    color: Color,
    /// Whether a bot strategy plays this seat.
    is_bot: bool,
    /// Progress of each piece.
    pieces: [Progress; MAX_PIECES],
    /// Whether each piece has arrived home.
    at_home: [bool; MAX_PIECES],
}

impl Player {
    /// Seats a player with every piece in base.
    #[instrument(skip(spec), fields(name = %spec.name))]
    pub fn new(id: PlayerId, spec: PlayerSpec) -> Self {
        Self {
            id,
            name: spec.name,
            color: spec.color,
            is_bot: spec.is_bot,
            pieces: [Progress::BASE; MAX_PIECES],
            at_home: [false; MAX_PIECES],
        }
    }

    /// Progress of one piece.
    pub fn progress(&self, piece: usize) -> Option<Progress> {
        self.pieces.get(piece).copied()
    }

    /// Whether one piece has arrived home.
    pub fn is_piece_home(&self, piece: usize) -> bool {
        self.at_home.get(piece).copied().unwrap_or(false)
    }

    /// True once all four pieces are home.
    pub fn has_won(&self) -> bool {
        self.at_home.iter().all(|home| *home)
    }

    /// Number of pieces that have arrived home.
    pub fn pieces_home(&self) -> usize {
        self.at_home.iter().filter(|home| **home).count()
    }

    /// Number of pieces still waiting in base.
    pub fn pieces_in_base(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_in_base()).count()
    }

    /// Sends one piece back to base. Out-of-range indices are ignored.
    pub fn reset_piece(&mut self, piece: usize) {
        if piece < MAX_PIECES {
            debug!(player = self.id, piece, from = %self.pieces[piece], "Piece sent to base");
            self.pieces[piece] = Progress::BASE;
            self.at_home[piece] = false;
        }
    }

    /// Sends every piece back to base.
    pub(crate) fn reset_all(&mut self) {
        for piece in 0..MAX_PIECES {
            self.reset_piece(piece);
        }
    }

    /// Moves a piece, marking it home when it reaches the final cell.
    pub(crate) fn set_progress(&mut self, piece: usize, progress: Progress) {
        self.pieces[piece] = progress;
        if progress == Progress::HOME {
            self.at_home[piece] = true;
        }
    }
}
