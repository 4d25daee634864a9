//! First-class invariants for a Ludo game.
//!
//! Invariants are logical properties that must hold after every engine
//! operation. They are checked in debug builds after each move and can be
//! tested independently. Each check recomputes what it needs from piece
//! positions rather than trusting the occupancy index it is auditing.

use crate::constants::{MAX_PIECES, TRACK_SIZE};
use crate::engine::Game;
use crate::geometry::{global_index, is_safe_square, track_coord};
use crate::phase::Phase;
use crate::player::PlayerId;
use crate::progress::Progress;
use derive_more::Display;

/// A logical property of a state, reported with the first offending detail.
pub trait Invariant<S> {
    /// Short name used in violation reports.
    const NAME: &'static str;

    /// Describes where the property fails, or `None` if it holds.
    fn find_violation(state: &S) -> Option<String>;

    /// Checks the property, packaging any failure as a violation.
    fn check(state: &S) -> Result<(), InvariantViolation> {
        match Self::find_violation(state) {
            Some(detail) => Err(InvariantViolation {
                invariant: Self::NAME,
                detail,
            }),
            None => Ok(()),
        }
    }
}

/// A failed invariant and what was found wrong.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{invariant}: {detail}")]
pub struct InvariantViolation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// The offending square, piece or field.
    pub detail: String,
}

/// Several invariants checked together.
pub trait InvariantSet<S> {
    /// Runs every check, collecting all violations.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect_violations<const N: usize>(
    results: [Result<(), InvariantViolation>; N],
) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = results.into_iter().filter_map(Result::err).collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect_violations([I1::check(state), I2::check(state)])
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect_violations([I1::check(state), I2::check(state), I3::check(state)])
    }
}

/// Owner of every piece standing on a global square, one entry per piece.
fn pieces_standing_on(game: &Game, global: usize) -> impl Iterator<Item = PlayerId> + '_ {
    game.players().iter().flat_map(move |player| {
        let id = *player.id();
        player
            .pieces()
            .iter()
            .filter(move |progress| global_index(id, **progress) == Some(global))
            .map(move |_| id)
    })
}

/// Invariant: each player's stack on a square equals that player's pieces standing there.
pub struct OccupancyMatchesPieces;

impl Invariant<Game> for OccupancyMatchesPieces {
    const NAME: &'static str = "occupancy matches pieces";

    fn find_violation(game: &Game) -> Option<String> {
        (0..TRACK_SIZE).find_map(|global| {
            let square = game.occupancy().square(global);
            game.players().iter().find_map(|player| {
                let id = *player.id();
                let standing = pieces_standing_on(game, global)
                    .filter(|owner| *owner == id)
                    .count();
                let stacked = usize::from(square.count_for(id));
                (stacked != standing).then(|| {
                    format!("square {global}: player {id} stack {stacked}, {standing} standing")
                })
            })
        })
    }
}

/// Invariant: a square has an occupant exactly when pieces stand on it, its
/// total matches them, and only safe squares hold more than one player.
pub struct StackCountsConsistent;

impl Invariant<Game> for StackCountsConsistent {
    const NAME: &'static str = "stack counts consistent";

    fn find_violation(game: &Game) -> Option<String> {
        (0..TRACK_SIZE).find_map(|global| {
            let square = game.occupancy().square(global);
            let mut owners: Vec<PlayerId> = pieces_standing_on(game, global).collect();
            let standing = owners.len();
            owners.dedup();

            if usize::from(square.count()) != standing {
                return Some(format!(
                    "square {global}: count {}, {standing} pieces standing",
                    square.count()
                ));
            }
            if square.occupant().is_some() != (standing > 0) {
                return Some(format!(
                    "square {global}: occupant {:?} with {standing} pieces standing",
                    square.occupant()
                ));
            }
            if owners.len() > 1 && !is_safe_square(track_coord(global)) {
                return Some(format!(
                    "square {global}: players {owners:?} share an unsafe square"
                ));
            }
            None
        })
    }
}

/// Invariant: progress values are in range, home flags agree, and the
/// winner is recorded exactly when the game is over.
pub struct ProgressInBounds;

impl Invariant<Game> for ProgressInBounds {
    const NAME: &'static str = "progress in bounds";

    fn find_violation(game: &Game) -> Option<String> {
        let piece_fault = game.players().iter().find_map(|player| {
            (0..MAX_PIECES).find_map(|piece| {
                let progress = player.pieces()[piece];
                let in_range = progress >= Progress::BASE && progress <= Progress::HOME;
                let flag_ok = player.is_piece_home(piece) == (progress == Progress::HOME);
                (!in_range || !flag_ok)
                    .then(|| format!("player {} piece {piece} at {}", player.id(), progress.value()))
            })
        });
        if piece_fault.is_some() {
            return piece_fault;
        }

        let over = game.phase() == Phase::GameOver;
        (game.winner().is_some() != over)
            .then(|| format!("winner {:?} in phase {}", game.winner(), game.phase()))
    }
}

/// All Ludo invariants as a composable set.
pub type LudoInvariants = (
    OccupancyMatchesPieces,
    StackCountsConsistent,
    ProgressInBounds,
);
