//! Turn state machine: rolling, moving, capturing and winning.

use crate::constants::{MAX_PIECES, MAX_PLAYERS};
use crate::dice::{Dice, RandomDice};
use crate::error::GameError;
use crate::geometry::{coordinate_for, global_index, is_safe_square, track_coord};
use crate::invariants::{InvariantSet, LudoInvariants};
use crate::occupancy::Occupancy;
use crate::phase::Phase;
use crate::player::{Player, PlayerId, PlayerSpec};
use crate::progress::Progress;
use crate::snapshot::{GameSnapshot, PieceView, PlayerView};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Result of a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Roll {
    player: PlayerId,
    value: u8,
    forfeited: bool,
}

impl Roll {
    /// Player who rolled.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Face value, 1-6.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// True if no piece could use the roll and the turn passed on.
    pub fn is_forfeited(&self) -> bool {
        self.forfeited
    }
}

/// What a successful move did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// Piece that moved.
    pub piece: usize,
    /// Progress before the move.
    pub from: Progress,
    /// Progress after the move.
    pub to: Progress,
    /// Opponent pieces sent back to base, as `(player, piece)`.
    pub captured: Vec<(PlayerId, usize)>,
    /// Whether the piece arrived home with this move.
    pub reached_home: bool,
    /// Set when this move won the game.
    pub winner: Option<PlayerId>,
    /// Whether the same player rolls again.
    pub extra_turn: bool,
}

/// A single Ludo game.
///
/// Owns its players, the track occupancy and its dice. Every public
/// operation is a bounded synchronous transition; callers sharing a game
/// across threads wrap it in a mutex.
#[derive(Debug)]
pub struct Game {
    players: Vec<Player>,
    occupancy: Occupancy,
    current: PlayerId,
    last_roll: Option<u8>,
    winner: Option<PlayerId>,
    phase: Phase,
    dice: Box<dyn Dice>,
}

impl Game {
    /// Creates an empty game with OS-seeded dice.
    #[instrument]
    pub fn new() -> Self {
        Self::with_dice(RandomDice::new())
    }

    /// Creates an empty game with deterministic dice.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self::with_dice(RandomDice::seeded(seed))
    }

    /// Creates an empty game rolling the given dice.
    pub fn with_dice(dice: impl Dice + 'static) -> Self {
        Self {
            players: Vec::with_capacity(MAX_PLAYERS),
            occupancy: Occupancy::new(),
            current: 0,
            last_roll: None,
            winner: None,
            phase: Phase::WaitingForPlayers,
            dice: Box::new(dice),
        }
    }

    /// Seated players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player at a seat.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Track occupancy.
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Seat of the player to act.
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Most recent roll.
    pub fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    /// Winner, once the game is over.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seats a player; the game becomes playable once two have joined.
    ///
    /// # Errors
    ///
    /// Returns `GameError::CapacityExceeded` when four players are seated.
    #[instrument(skip(self, spec), fields(name = %spec.name()))]
    pub fn add_player(&mut self, spec: PlayerSpec) -> Result<PlayerId, GameError> {
        if self.players.len() >= MAX_PLAYERS {
            warn!("Game already has four players");
            return Err(GameError::CapacityExceeded);
        }

        let id = self.players.len();
        self.players.push(Player::new(id, spec));
        info!(player = id, seated = self.players.len(), "Player joined");

        if self.players.len() >= 2 && self.phase == Phase::WaitingForPlayers {
            self.phase = Phase::WaitingForRoll;
            info!("Enough players, waiting for first roll");
        }
        Ok(id)
    }

    /// True if `player` could spend `roll` on at least one piece.
    pub fn has_possible_moves(&self, player: PlayerId, roll: u8) -> bool {
        !self.legal_moves(player, roll).is_empty()
    }

    /// Pieces of `player` that could legally move `roll` steps.
    pub fn legal_moves(&self, player: PlayerId, roll: u8) -> Vec<usize> {
        let Some(p) = self.players.get(player) else {
            return Vec::new();
        };
        (0..MAX_PIECES)
            .filter(|piece| destination(p, *piece, roll).is_ok())
            .collect()
    }

    /// Rolls the die for the current player.
    ///
    /// If the roll cannot be used by any piece the turn passes to the next
    /// player immediately; the roll is still returned, marked forfeited.
    ///
    /// # Errors
    ///
    /// - `GameError::WrongPhase` outside `WaitingForRoll`
    /// - `GameError::UnknownPlayer` for an empty seat
    /// - `GameError::NotCurrentPlayer` when it is someone else's turn
    #[instrument(skip(self))]
    pub fn roll_dice(&mut self, player: PlayerId) -> Result<Roll, GameError> {
        self.ensure_turn(player, Phase::WaitingForRoll)?;

        let value = self.dice.roll();
        self.last_roll = Some(value);

        let forfeited = !self.has_possible_moves(player, value);
        if forfeited {
            info!(player, roll = value, "No legal move, turn passes");
            self.next_turn();
        } else {
            debug!(player, roll = value, "Waiting for move");
            self.phase = Phase::WaitingForMove;
        }

        Ok(Roll {
            player,
            value,
            forfeited,
        })
    }

    /// Spends the pending roll on one of the current player's pieces.
    ///
    /// A rejected move leaves the game untouched, so the player may try
    /// another piece.
    ///
    /// # Errors
    ///
    /// - `GameError::WrongPhase` outside `WaitingForMove`
    /// - `GameError::UnknownPlayer` / `GameError::NotCurrentPlayer`
    /// - `GameError::InvalidPieceIndex` for a piece outside 0-3
    /// - `GameError::IllegalSpawn` leaving base without a six
    /// - `GameError::PieceAlreadyHome` for a finished piece
    /// - `GameError::Overshoot` when the roll would pass home
    #[instrument(skip(self))]
    pub fn make_move(&mut self, player: PlayerId, piece: usize) -> Result<MoveOutcome, GameError> {
        self.ensure_turn(player, Phase::WaitingForMove)?;
        if piece >= MAX_PIECES {
            return Err(GameError::InvalidPieceIndex(piece));
        }

        let roll = self.last_roll.unwrap_or_default();
        let from = self.players[player].pieces()[piece];
        let to = destination(&self.players[player], piece, roll).inspect_err(|e| {
            debug!(player, piece, roll, error = %e, "Move rejected");
        })?;

        if let Some(old) = global_index(player, from) {
            self.occupancy.vacate(old, player);
        }
        self.players[player].set_progress(piece, to);

        let mut captured = Vec::new();
        if let Some(new) = global_index(player, to) {
            captured = self.resolve_capture(player, new);
            self.occupancy.occupy(new, player);
        }

        let reached_home = to.is_home();
        info!(
            player,
            piece,
            roll,
            from = %from,
            to = %to,
            captures = captured.len(),
            reached_home,
            "Piece moved"
        );

        self.check_winner();
        let extra_turn = self.phase != Phase::GameOver && roll == 6;
        if self.phase != Phase::GameOver {
            if extra_turn {
                self.phase = Phase::WaitingForRoll;
            } else {
                self.next_turn();
            }
        }

        debug_assert!(
            LudoInvariants::check_all(self).is_ok(),
            "invariants violated after move: {:?}",
            LudoInvariants::check_all(self)
        );

        Ok(MoveOutcome {
            piece,
            from,
            to,
            captured,
            reached_home,
            winner: self.winner,
            extra_turn,
        })
    }

    /// Sends every piece to base and starts over with the same players.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.reset_all();
        }
        self.occupancy.clear();
        self.current = 0;
        self.last_roll = None;
        self.winner = None;
        self.phase = if self.players.len() >= 2 {
            Phase::WaitingForRoll
        } else {
            Phase::WaitingForPlayers
        };
        info!(phase = %self.phase, "Game reset");
    }

    /// Puts a piece at an arbitrary progress, keeping occupancy in step.
    ///
    /// Used to set up positions for puzzles and tests. Captures are not
    /// resolved and the turn is left alone, but the placement must respect
    /// the board: no two players on an unsafe square. Completing a player's
    /// fourth piece ends the game in their favour.
    ///
    /// # Errors
    ///
    /// - `GameError::UnknownPlayer` / `GameError::InvalidPieceIndex`
    /// - `GameError::ProgressOutOfRange` outside base..=home
    /// - `GameError::WrongPhase` once the game is over
    /// - `GameError::SquareTaken` when an opponent holds an unsafe square
    #[instrument(skip(self))]
    pub fn place_piece(
        &mut self,
        player: PlayerId,
        piece: usize,
        progress: Progress,
    ) -> Result<(), GameError> {
        if player >= self.players.len() {
            return Err(GameError::UnknownPlayer(player));
        }
        if piece >= MAX_PIECES {
            return Err(GameError::InvalidPieceIndex(piece));
        }
        if progress < Progress::BASE || progress > Progress::HOME {
            return Err(GameError::ProgressOutOfRange(progress.value()));
        }
        if self.phase == Phase::GameOver {
            return Err(GameError::WrongPhase { phase: self.phase });
        }

        let target = global_index(player, progress);
        if let Some(global) = target {
            let blocked_by = self
                .occupancy
                .square(global)
                .players()
                .find(|other| *other != player)
                .filter(|_| !is_safe_square(track_coord(global)));
            if let Some(occupant) = blocked_by {
                debug!(player, piece, square = global, occupant, "Placement blocked");
                return Err(GameError::SquareTaken {
                    square: global,
                    occupant,
                });
            }
        }

        let from = self.players[player].pieces()[piece];
        if let Some(old) = global_index(player, from) {
            self.occupancy.vacate(old, player);
        }
        self.players[player].reset_piece(piece);
        self.players[player].set_progress(piece, progress);
        if let Some(new) = target {
            self.occupancy.occupy(new, player);
        }

        self.check_winner();
        Ok(())
    }

    /// Mutable occupancy for corrupting state in invariant tests.
    #[cfg(test)]
    pub(crate) fn occupancy_mut(&mut self) -> &mut Occupancy {
        &mut self.occupancy
    }

    /// Sets a piece with no rule checks at all.
    #[cfg(test)]
    pub(crate) fn force_piece(&mut self, player: PlayerId, piece: usize, progress: Progress) {
        self.players[player].set_progress(piece, progress);
        if let Some(global) = global_index(player, progress) {
            self.occupancy.occupy(global, player);
        }
    }

    /// Builds a read-only view for transports.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> GameSnapshot {
        let players = self
            .players
            .iter()
            .map(|p| {
                let pieces = p
                    .pieces()
                    .iter()
                    .enumerate()
                    .map(|(i, progress)| {
                        let coord = coordinate_for(*p.id(), *progress);
                        PieceView::new(coord.row, coord.col, progress.value(), p.is_piece_home(i))
                    })
                    .collect();
                PlayerView::new(p, pieces)
            })
            .collect();

        let legal_moves = match (self.phase, self.last_roll) {
            (Phase::WaitingForMove, Some(roll)) => self.legal_moves(self.current, roll),
            _ => Vec::new(),
        };

        GameSnapshot::new(
            self.current,
            self.last_roll,
            self.phase,
            self.winner,
            legal_moves,
            players,
        )
    }

    fn ensure_turn(&self, player: PlayerId, expected: Phase) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::WrongPhase { phase: self.phase });
        }
        if player >= self.players.len() {
            return Err(GameError::UnknownPlayer(player));
        }
        if player != self.current {
            warn!(player, current = self.current, "Player acted out of turn");
            return Err(GameError::NotCurrentPlayer {
                current: self.current,
            });
        }
        Ok(())
    }

    /// Sends opponents on a non-safe square back to base.
    ///
    /// Called with the lock already held by the caller of `make_move`.
    fn resolve_capture(&mut self, mover: PlayerId, global: usize) -> Vec<(PlayerId, usize)> {
        if is_safe_square(track_coord(global)) {
            return Vec::new();
        }

        let victims: Vec<PlayerId> = self
            .occupancy
            .square(global)
            .players()
            .filter(|p| *p != mover)
            .collect();

        let mut captured = Vec::new();
        for victim in victims {
            for piece in 0..MAX_PIECES {
                let progress = self.players[victim].pieces()[piece];
                if global_index(victim, progress) == Some(global) {
                    self.players[victim].reset_piece(piece);
                    captured.push((victim, piece));
                }
            }
            self.occupancy.evict(global, victim);
            info!(mover, victim, square = global, "Capture");
        }
        captured
    }

    fn check_winner(&mut self) {
        if let Some(winner) = self.players.iter().find(|p| p.has_won()) {
            let id = *winner.id();
            info!(winner = id, "Game over");
            self.winner = Some(id);
            self.phase = Phase::GameOver;
        }
    }

    fn next_turn(&mut self) {
        self.current = (self.current + 1) % self.players.len();
        self.phase = Phase::WaitingForRoll;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Where `piece` would land with `roll`, or why it cannot move.
fn destination(player: &Player, piece: usize, roll: u8) -> Result<Progress, GameError> {
    let progress = player
        .progress(piece)
        .ok_or(GameError::InvalidPieceIndex(piece))?;

    if progress.is_in_base() {
        return if roll == 6 {
            Ok(Progress::START)
        } else {
            Err(GameError::IllegalSpawn { roll })
        };
    }
    if player.is_piece_home(piece) {
        return Err(GameError::PieceAlreadyHome(piece));
    }
    progress.advanced_by(roll).ok_or(GameError::Overshoot { roll })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::player::Color;

    fn two_player_game(rolls: impl IntoIterator<Item = u8>) -> Game {
        let mut game = Game::with_dice(ScriptedDice::new(rolls));
        game.add_player(PlayerSpec::human("Green", Color::Green)).unwrap();
        game.add_player(PlayerSpec::human("Red", Color::Red)).unwrap();
        game
    }

    #[test]
    fn test_waits_for_second_player() {
        let mut game = Game::seeded(1);
        assert_eq!(game.phase(), Phase::WaitingForPlayers);
        game.add_player(PlayerSpec::human("Green", Color::Green)).unwrap();
        assert_eq!(game.phase(), Phase::WaitingForPlayers);
        assert_eq!(
            game.roll_dice(0),
            Err(GameError::WrongPhase {
                phase: Phase::WaitingForPlayers
            })
        );
        game.add_player(PlayerSpec::bot("Red", Color::Red)).unwrap();
        assert_eq!(game.phase(), Phase::WaitingForRoll);
    }

    #[test]
    fn test_fifth_player_rejected() {
        let mut game = Game::seeded(1);
        for color in [Color::Green, Color::Red, Color::Blue, Color::Yellow] {
            game.add_player(PlayerSpec::human(color.to_string(), color)).unwrap();
        }
        let result = game.add_player(PlayerSpec::human("Extra", Color::Green));
        assert_eq!(result, Err(GameError::CapacityExceeded));
        assert_eq!(game.players().len(), 4);
    }

    #[test]
    fn test_spawn_registers_entry_square() {
        let mut game = two_player_game([6]);
        game.roll_dice(0).unwrap();
        game.make_move(0, 1).unwrap();
        assert_eq!(game.occupancy().occupant(0), Some(0));
        assert_eq!(game.occupancy().count(0), 1);
    }

    #[test]
    fn test_rejected_move_keeps_phase() {
        let mut game = two_player_game([6, 3]);
        game.roll_dice(0).unwrap();
        game.make_move(0, 0).unwrap();
        game.roll_dice(0).unwrap();
        assert_eq!(game.make_move(0, 1), Err(GameError::IllegalSpawn { roll: 3 }));
        assert_eq!(game.phase(), Phase::WaitingForMove);
        assert_eq!(game.make_move(0, 4), Err(GameError::InvalidPieceIndex(4)));
        let outcome = game.make_move(0, 0).unwrap();
        assert_eq!(outcome.to, Progress::new(3));
        assert_eq!(game.current_player(), 1);
    }

    #[test]
    fn test_moving_off_square_vacates_it() {
        let mut game = two_player_game([6, 4]);
        game.roll_dice(0).unwrap();
        game.make_move(0, 0).unwrap();
        game.roll_dice(0).unwrap();
        game.make_move(0, 0).unwrap();
        assert!(game.occupancy().square(0).is_empty());
        assert_eq!(game.occupancy().occupant(4), Some(0));
    }

    #[test]
    fn test_forfeited_roll_passes_turn() {
        let mut game = two_player_game([3]);
        let roll = game.roll_dice(0).unwrap();
        assert!(roll.is_forfeited());
        assert_eq!(roll.value(), 3);
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.phase(), Phase::WaitingForRoll);
        assert_eq!(game.last_roll(), Some(3));
    }

    #[test]
    fn test_place_piece_keeps_occupancy_in_step() {
        let mut game = two_player_game([1]);
        game.place_piece(1, 2, Progress::new(5)).unwrap();
        assert_eq!(game.occupancy().occupant(18), Some(1));
        game.place_piece(1, 2, Progress::new(53)).unwrap();
        assert!(game.occupancy().is_empty());
        assert_eq!(
            game.place_piece(3, 0, Progress::START),
            Err(GameError::UnknownPlayer(3))
        );
    }

    #[test]
    fn test_place_piece_rejects_opponent_on_unsafe_square() {
        let mut game = two_player_game([3]);
        // Green offset 10 and Red offset 49 are both global square 10.
        game.place_piece(0, 0, Progress::new(10)).unwrap();
        assert_eq!(
            game.place_piece(1, 0, Progress::new(49)),
            Err(GameError::SquareTaken {
                square: 10,
                occupant: 0
            })
        );
        assert_eq!(game.player(1).unwrap().progress(0), Some(Progress::BASE));

        game.place_piece(0, 1, Progress::new(20)).unwrap();
        game.roll_dice(0).unwrap();
        let outcome = game.make_move(0, 1).unwrap();
        assert_eq!(outcome.to, Progress::new(23));
        assert!(LudoInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_place_piece_rejects_out_of_range_progress() {
        let mut game = two_player_game([1]);
        assert_eq!(
            game.place_piece(0, 0, Progress::new(60)),
            Err(GameError::ProgressOutOfRange(60))
        );
        assert_eq!(
            game.place_piece(0, 0, Progress::new(-3)),
            Err(GameError::ProgressOutOfRange(-3))
        );
    }

    #[test]
    fn test_placing_last_piece_home_wins_for_that_player() {
        let mut game = two_player_game([6]);
        for piece in 0..MAX_PIECES {
            game.place_piece(0, piece, Progress::HOME).unwrap();
        }

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.winner(), Some(0));
        assert_eq!(
            game.roll_dice(0),
            Err(GameError::WrongPhase {
                phase: Phase::GameOver
            })
        );
        assert_eq!(
            game.place_piece(1, 0, Progress::START),
            Err(GameError::WrongPhase {
                phase: Phase::GameOver
            })
        );
        assert!(LudoInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_reset_with_one_player_waits_for_players() {
        let mut game = Game::with_dice(ScriptedDice::new([6]));
        game.add_player(PlayerSpec::human("Green", Color::Green)).unwrap();
        game.place_piece(0, 0, Progress::new(12)).unwrap();

        game.reset();

        assert_eq!(game.phase(), Phase::WaitingForPlayers);
        assert_eq!(game.player(0).unwrap().pieces_in_base(), MAX_PIECES);
        assert!(game.occupancy().is_empty());
        assert_eq!(
            game.roll_dice(0),
            Err(GameError::WrongPhase {
                phase: Phase::WaitingForPlayers
            })
        );
    }
}
