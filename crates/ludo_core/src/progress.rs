//! Per-piece progress encoding.

use crate::constants::{HOME_STRETCH_SIZE, TOTAL_PROGRESS_STEPS, TRACK_SIZE};
use serde::{Deserialize, Serialize};

/// Where a piece is along its journey from base to home.
///
/// Encoded as a single signed integer:
/// - `-1` - in base
/// - `0..=51` - on the shared track, relative to the owner's entry square
/// - `52..=56` - inside the owner's home stretch
/// - `57` - home
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(i8);

/// Decoded view of a [`Progress`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Waiting in base for a six.
    Base,
    /// On the shared track at the given personal offset.
    Track(usize),
    /// Inside the private home stretch at the given offset.
    Stretch(usize),
    /// Arrived home.
    Home,
}

impl Progress {
    /// Piece is in base.
    pub const BASE: Self = Self(-1);

    /// Piece has just entered the track on its owner's entry square.
    pub const START: Self = Self(0);

    /// Piece has arrived home.
    pub const HOME: Self = Self((TOTAL_PROGRESS_STEPS - 1) as i8);

    /// Wraps a raw progress value.
    pub const fn new(raw: i8) -> Self {
        Self(raw)
    }

    /// Returns the raw encoded value.
    pub const fn value(self) -> i8 {
        self.0
    }

    /// Decodes the value into a [`Stage`]. Values past home clamp to [`Stage::Home`].
    pub fn stage(self) -> Stage {
        match self.0 {
            raw if raw < 0 => Stage::Base,
            raw if (raw as usize) < TRACK_SIZE => Stage::Track(raw as usize),
            raw if (raw as usize) < TRACK_SIZE + HOME_STRETCH_SIZE => {
                Stage::Stretch(raw as usize - TRACK_SIZE)
            }
            _ => Stage::Home,
        }
    }

    /// True while the piece waits in base.
    pub fn is_in_base(self) -> bool {
        self.stage() == Stage::Base
    }

    /// True while the piece is on the shared track.
    pub fn is_on_track(self) -> bool {
        matches!(self.stage(), Stage::Track(_))
    }

    /// True once the piece has arrived home.
    pub fn is_home(self) -> bool {
        self.stage() == Stage::Home
    }

    /// Progress after moving `roll` steps, or `None` if that would pass home.
    ///
    /// Only meaningful for pieces already on the board.
    pub fn advanced_by(self, roll: u8) -> Option<Self> {
        let next = i16::from(self.0) + i16::from(roll);
        if next >= TOTAL_PROGRESS_STEPS as i16 {
            None
        } else {
            Some(Self(next as i8))
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::BASE
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stage() {
            Stage::Base => write!(f, "base"),
            Stage::Track(offset) => write!(f, "track+{}", offset),
            Stage::Stretch(offset) => write!(f, "stretch+{}", offset),
            Stage::Home => write!(f, "home"),
        }
    }
}
