//! Occupancy index for the shared track.
//!
//! One entry per global track square, recording how many pieces of each
//! player stand there. Off safe squares at most one player is ever present;
//! safe squares may be shared.

use crate::constants::{MAX_PLAYERS, TRACK_SIZE};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Stacked piece counts on one track square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSquare {
    stacks: [u8; MAX_PLAYERS],
}

impl TrackSquare {
    /// A player standing here, `None` only when the square is empty.
    ///
    /// On a shared safe square this is the lowest seat present; use
    /// [`players`](Self::players) to see all of them.
    pub fn occupant(&self) -> Option<PlayerId> {
        self.players().next()
    }

    /// True if pieces of more than one player stand here.
    pub fn is_shared(&self) -> bool {
        self.players().nth(1).is_some()
    }

    /// Every player with at least one piece here.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.stacks
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(player, _)| player)
    }

    /// Pieces of one player stacked here.
    pub fn count_for(&self, player: PlayerId) -> u8 {
        self.stacks.get(player).copied().unwrap_or(0)
    }

    /// Total pieces on the square.
    pub fn count(&self) -> u8 {
        self.stacks.iter().sum()
    }

    /// True if no piece stands here.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Occupancy of all shared track squares, indexed by global track index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    squares: [TrackSquare; TRACK_SIZE],
}

impl Occupancy {
    /// An empty track.
    pub fn new() -> Self {
        Self {
            squares: [TrackSquare::default(); TRACK_SIZE],
        }
    }

    /// The square at a global index.
    pub fn square(&self, global: usize) -> &TrackSquare {
        &self.squares[global % TRACK_SIZE]
    }

    /// All squares in global order.
    pub fn squares(&self) -> &[TrackSquare; TRACK_SIZE] {
        &self.squares
    }

    /// Shorthand for `square(global).occupant()`.
    pub fn occupant(&self, global: usize) -> Option<PlayerId> {
        self.square(global).occupant()
    }

    /// Total pieces on a square.
    pub fn count(&self, global: usize) -> u8 {
        self.square(global).count()
    }

    /// Adds one of `player`'s pieces to a square.
    pub(crate) fn occupy(&mut self, global: usize, player: PlayerId) {
        let stack = &mut self.squares[global % TRACK_SIZE].stacks[player];
        *stack = stack.saturating_add(1);
    }

    /// Removes one of `player`'s pieces from a square.
    pub(crate) fn vacate(&mut self, global: usize, player: PlayerId) {
        let stack = &mut self.squares[global % TRACK_SIZE].stacks[player];
        *stack = stack.saturating_sub(1);
    }

    /// Removes every piece of `player` from a square.
    pub(crate) fn evict(&mut self, global: usize, player: PlayerId) {
        self.squares[global % TRACK_SIZE].stacks[player] = 0;
    }

    /// Empties the whole track.
    pub(crate) fn clear(&mut self) {
        self.squares = [TrackSquare::default(); TRACK_SIZE];
    }

    /// True if no square holds a piece.
    pub fn is_empty(&self) -> bool {
        self.squares.iter().all(TrackSquare::is_empty)
    }
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::new()
    }
}
