//! Fixed board geometry: the shared track, home stretches and safe squares.
//!
//! The board is a 15x15 grid. Every lookup here is a pure function of its
//! arguments; nothing in this module is ever mutated.

use crate::constants::{HOME_STRETCH_SIZE, MAX_PLAYERS, PLAYER_SPACING, TRACK_SIZE};
use crate::player::PlayerId;
use crate::progress::{Progress, Stage};
use serde::{Deserialize, Serialize};

/// A cell on the board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Grid row, top to bottom.
    pub row: i8,
    /// Grid column, left to right.
    pub col: i8,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const fn c(row: i8, col: i8) -> Coord {
    Coord::new(row, col)
}

/// The shared track, clockwise from Green's entry square.
#[rustfmt::skip]
const TRACK_PATH: [Coord; TRACK_SIZE] = [
    c(6, 1), c(6, 2), c(6, 3), c(6, 4), c(6, 5),
    c(5, 6), c(4, 6), c(3, 6), c(2, 6), c(1, 6), c(0, 6),
    c(0, 7), c(0, 8),
    c(1, 8), c(2, 8), c(3, 8), c(4, 8), c(5, 8),
    c(6, 9), c(6, 10), c(6, 11), c(6, 12), c(6, 13), c(6, 14),
    c(7, 14), c(8, 14),
    c(8, 13), c(8, 12), c(8, 11), c(8, 10), c(8, 9),
    c(9, 8), c(10, 8), c(11, 8), c(12, 8), c(13, 8), c(14, 8),
    c(14, 7), c(14, 6),
    c(13, 6), c(12, 6), c(11, 6), c(10, 6), c(9, 6),
    c(8, 5), c(8, 4), c(8, 3), c(8, 2), c(8, 1), c(8, 0),
    c(7, 0), c(6, 0),
];

/// Private home stretches per seat; the last cell of each is home.
#[rustfmt::skip]
const HOME_STRETCHES: [[Coord; HOME_STRETCH_SIZE + 1]; MAX_PLAYERS] = [
    // Green
    [c(7, 1), c(7, 2), c(7, 3), c(7, 4), c(7, 5), c(7, 6)],
    // Red
    [c(1, 7), c(2, 7), c(3, 7), c(4, 7), c(5, 7), c(6, 7)],
    // Blue
    [c(7, 13), c(7, 12), c(7, 11), c(7, 10), c(7, 9), c(7, 8)],
    // Yellow
    [c(13, 7), c(12, 7), c(11, 7), c(10, 7), c(9, 7), c(8, 7)],
];

/// Capture-immune squares: the four entry squares followed by four mid-track stars.
pub const SAFE_SQUARES: [Coord; 8] = [
    c(6, 1),
    c(1, 8),
    c(8, 13),
    c(13, 6),
    c(8, 3),
    c(2, 6),
    c(6, 12),
    c(12, 8),
];

/// Global track index for a piece on the shared track, `None` anywhere else.
///
/// The global index is measured from Green's entry square; each seat enters
/// [`PLAYER_SPACING`] squares after the previous one.
pub fn global_index(player: PlayerId, progress: Progress) -> Option<usize> {
    match progress.stage() {
        Stage::Track(offset) => Some((offset + seat(player) * PLAYER_SPACING) % TRACK_SIZE),
        _ => None,
    }
}

/// Board cell for a piece of `player` at `progress`.
///
/// Total for every input: base pieces report their owner's entry square
/// (a display hint only) and anything past home clamps to the home cell.
pub fn coordinate_for(player: PlayerId, progress: Progress) -> Coord {
    let seat = seat(player);
    match progress.stage() {
        Stage::Base => TRACK_PATH[(seat * PLAYER_SPACING) % TRACK_SIZE],
        Stage::Track(offset) => TRACK_PATH[(offset + seat * PLAYER_SPACING) % TRACK_SIZE],
        Stage::Stretch(offset) => HOME_STRETCHES[seat][offset],
        Stage::Home => HOME_STRETCHES[seat][HOME_STRETCH_SIZE],
    }
}

/// Track coordinate for a global index.
pub(crate) fn track_coord(global: usize) -> Coord {
    TRACK_PATH[global % TRACK_SIZE]
}

/// True if pieces on this cell cannot be captured.
pub fn is_safe_square(coord: Coord) -> bool {
    SAFE_SQUARES.contains(&coord)
}

fn seat(player: PlayerId) -> usize {
    player % MAX_PLAYERS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOTAL_PROGRESS_STEPS;
    use std::collections::HashSet;

    #[test]
    fn test_track_cells_are_distinct() {
        let cells: HashSet<_> = TRACK_PATH.iter().collect();
        assert_eq!(cells.len(), TRACK_SIZE);
    }

    #[test]
    fn test_entry_squares_are_spaced_evenly_and_safe() {
        for player in 0..MAX_PLAYERS {
            let entry = coordinate_for(player, Progress::START);
            assert_eq!(entry, TRACK_PATH[player * 13]);
            assert!(is_safe_square(entry), "entry of seat {} should be safe", player);
        }
    }

    #[test]
    fn test_every_safe_square_is_on_the_track() {
        for safe in SAFE_SQUARES {
            assert!(TRACK_PATH.contains(&safe), "{} is not on the track", safe);
        }
        assert_eq!(TRACK_PATH.iter().filter(|c| is_safe_square(**c)).count(), 8);
    }

    #[test]
    fn test_global_index_wraps_around() {
        assert_eq!(global_index(0, Progress::new(51)), Some(51));
        assert_eq!(global_index(1, Progress::new(51)), Some(12));
        assert_eq!(global_index(3, Progress::new(13)), Some(0));
        assert_eq!(global_index(2, Progress::BASE), None);
        assert_eq!(global_index(2, Progress::new(52)), None);
    }

    #[test]
    fn test_home_stretch_lookup() {
        assert_eq!(coordinate_for(0, Progress::new(52)), Coord::new(7, 1));
        assert_eq!(coordinate_for(1, Progress::HOME), Coord::new(6, 7));
        assert_eq!(coordinate_for(2, Progress::new(54)), Coord::new(7, 11));
        assert_eq!(coordinate_for(3, Progress::HOME), Coord::new(8, 7));
    }

    #[test]
    fn test_base_reports_entry_square() {
        assert_eq!(coordinate_for(2, Progress::BASE), coordinate_for(2, Progress::START));
    }

    #[test]
    fn test_progress_past_home_clamps() {
        let home = coordinate_for(1, Progress::new((TOTAL_PROGRESS_STEPS - 1) as i8));
        assert_eq!(coordinate_for(1, Progress::new(80)), home);
        assert_eq!(coordinate_for(1, Progress::new(i8::MAX)), home);
    }

    #[test]
    fn test_track_coord_matches_coordinate_for() {
        for progress in 0..TRACK_SIZE as i8 {
            let progress = Progress::new(progress);
            let global = global_index(3, progress).unwrap();
            assert_eq!(track_coord(global), coordinate_for(3, progress));
        }
    }
}
