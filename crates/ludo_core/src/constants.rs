//! Board dimensions shared by every module.

/// Number of squares on the shared circular track.
pub const TRACK_SIZE: usize = 52;

/// Number of steps inside a home stretch before arriving home.
///
/// The stretch itself has `HOME_STRETCH_SIZE + 1` cells; the last one is home.
pub const HOME_STRETCH_SIZE: usize = 5;

/// Total distinct on-board progress values (0 through 57).
pub const TOTAL_PROGRESS_STEPS: usize = TRACK_SIZE + HOME_STRETCH_SIZE + 1;

/// Pieces per player.
pub const MAX_PIECES: usize = 4;

/// Seats at the table.
pub const MAX_PLAYERS: usize = 4;

/// Distance between consecutive players' entry squares.
pub const PLAYER_SPACING: usize = TRACK_SIZE / MAX_PLAYERS;
