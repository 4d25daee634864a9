//! Ludo game engine.
//!
//! Pure game logic for a four-player race game on a cross-shaped track,
//! with no knowledge of sessions or transports.
//!
//! # Architecture
//!
//! - **Geometry**: fixed track path, home stretches and safe squares
//! - **Player**: per-seat piece progress and home flags
//! - **Occupancy**: who stands on each shared track square
//! - **Game**: the roll/move state machine with capture and win detection
//!
//! # Example
//!
//! ```
//! use ludo_core::{Color, Game, PlayerSpec, ScriptedDice};
//!
//! # fn example() -> Result<(), ludo_core::GameError> {
//! let mut game = Game::with_dice(ScriptedDice::new([6]));
//! let green = game.add_player(PlayerSpec::human("Green", Color::Green))?;
//! game.add_player(PlayerSpec::human("Red", Color::Red))?;
//!
//! let roll = game.roll_dice(green)?;
//! assert_eq!(roll.value(), 6);
//! game.make_move(green, 0)?;
//! assert_eq!(*game.snapshot().players()[0].pieces()[0].progress(), 0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod constants;
mod dice;
mod engine;
mod error;
mod geometry;
mod invariants;
mod occupancy;
mod phase;
mod player;
mod progress;
mod snapshot;

pub use constants::{
    HOME_STRETCH_SIZE, MAX_PIECES, MAX_PLAYERS, PLAYER_SPACING, TOTAL_PROGRESS_STEPS, TRACK_SIZE,
};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use engine::{Game, MoveOutcome, Roll};
pub use error::GameError;
pub use geometry::{Coord, SAFE_SQUARES, coordinate_for, global_index, is_safe_square};
pub use invariants::{
    Invariant, InvariantSet, InvariantViolation, LudoInvariants, OccupancyMatchesPieces,
    ProgressInBounds, StackCountsConsistent,
};
pub use occupancy::{Occupancy, TrackSquare};
pub use phase::Phase;
pub use player::{Color, Player, PlayerId, PlayerSpec};
pub use progress::{Progress, Stage};
pub use snapshot::{GameSnapshot, PieceView, PlayerView};
