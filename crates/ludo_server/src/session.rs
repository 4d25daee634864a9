//! Game session management.
//!
//! Each session owns one [`Game`] behind its own mutex. The registry map has
//! a separate lock that is held only while looking sessions up, never while
//! a game operation runs, so sessions proceed independently.

use crate::bot::{BotStrategy, play_bot_turns};
use crate::config::ServerConfig;
use ludo_core::{Game, GameError, GameSnapshot, MoveOutcome, PlayerId, PlayerSpec, Roll};
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Opaque identifier of a game session.
pub type SessionId = String;

const SESSION_ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SESSION_ID_LEN: usize = 6;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A single game plus the strategy that plays its bot seats.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    game: Mutex<Game>,
    bot: Arc<dyn BotStrategy>,
}

impl GameSession {
    /// Wraps a game in a session.
    #[instrument(skip(game, bot))]
    pub fn new(id: SessionId, game: Game, bot: Arc<dyn BotStrategy>) -> Self {
        info!(session_id = %id, "Creating new game session");
        Self {
            id,
            game: Mutex::new(game),
            bot,
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Seats a player, then lets bots act if it is their turn.
    #[instrument(skip(self, spec), fields(session_id = %self.id))]
    pub fn add_player(&self, spec: PlayerSpec) -> Result<PlayerId, GameError> {
        let mut game = lock(&self.game);
        let id = game.add_player(spec)?;
        self.drive_bots(&mut game)?;
        Ok(id)
    }

    /// Rolls for `player`, then lets bots act if the turn passed to them.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn roll(&self, player: PlayerId) -> Result<Roll, GameError> {
        let mut game = lock(&self.game);
        let roll = game.roll_dice(player)?;
        self.drive_bots(&mut game)?;
        Ok(roll)
    }

    /// Moves a piece for `player`, then lets bots act.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn make_move(&self, player: PlayerId, piece: usize) -> Result<MoveOutcome, GameError> {
        let mut game = lock(&self.game);
        let outcome = game.make_move(player, piece)?;
        self.drive_bots(&mut game)?;
        Ok(outcome)
    }

    /// Starts the game over with the same players.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset(&self) -> Result<(), GameError> {
        let mut game = lock(&self.game);
        game.reset();
        self.drive_bots(&mut game)?;
        Ok(())
    }

    /// Point-in-time view of the game.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn snapshot(&self) -> GameSnapshot {
        lock(&self.game).snapshot()
    }

    /// Number of seated players.
    pub fn player_count(&self) -> usize {
        lock(&self.game).players().len()
    }

    fn drive_bots(&self, game: &mut Game) -> Result<(), GameError> {
        let actions = play_bot_turns(game, self.bot.as_ref())?;
        if actions > 0 {
            debug!(session_id = %self.id, actions, "Bots played");
        }
        Ok(())
    }
}

/// Registry of all live sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<GameSession>>>>,
    bot: Arc<dyn BotStrategy>,
    default_players: Arc<Vec<PlayerSpec>>,
    seed: Option<u64>,
    games_created: Arc<AtomicU64>,
}

impl SessionManager {
    /// Creates a session manager from server configuration.
    #[instrument(skip(config))]
    pub fn new(config: &ServerConfig) -> Self {
        info!(bot = %config.bot_strategy(), seed = ?config.seed(), "Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            bot: Arc::from(config.bot_strategy().strategy()),
            default_players: Arc::new(config.default_players().clone()),
            seed: *config.seed(),
            games_created: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a game, seating `players` or the configured default seats.
    ///
    /// # Errors
    ///
    /// `GameError::CapacityExceeded` if more than four players are listed.
    #[instrument(skip(self, players))]
    pub fn create_game(&self, players: Option<Vec<PlayerSpec>>) -> Result<SessionId, GameError> {
        let players = players.unwrap_or_else(|| self.default_players.as_ref().clone());

        let mut game = self.new_game();
        for spec in players {
            game.add_player(spec)?;
        }
        play_bot_turns(&mut game, self.bot.as_ref())?;

        Ok(self.insert_game(game))
    }

    /// Registers an already built game under a fresh id.
    #[instrument(skip(self, game))]
    pub fn insert_game(&self, game: Game) -> SessionId {
        let mut sessions = lock(&self.sessions);

        let mut id = generate_session_id();
        while sessions.contains_key(&id) {
            debug!(session_id = %id, "Session id collision, regenerating");
            id = generate_session_id();
        }

        let session = GameSession::new(id.clone(), game, Arc::clone(&self.bot));
        sessions.insert(id.clone(), Arc::new(session));

        info!(session_id = %id, live = sessions.len(), "Created new session");
        id
    }

    /// Gets a session by id.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Option<Arc<GameSession>> {
        let session = lock(&self.sessions).get(id).cloned();
        if session.is_none() {
            debug!(session_id = id, "Session not found");
        }
        session
    }

    /// Removes a session; returns false if it did not exist.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> bool {
        let removed = lock(&self.sessions).remove(id).is_some();
        if removed {
            info!(session_id = id, "Session removed");
        } else {
            warn!(session_id = id, "Tried to remove unknown session");
        }
        removed
    }

    /// Lists all active session ids, sorted.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = lock(&self.sessions).keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    fn new_game(&self) -> Game {
        let index = self.games_created.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => Game::seeded(seed.wrapping_add(index)),
            None => Game::new(),
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(&ServerConfig::default())
    }
}

fn generate_session_id() -> SessionId {
    let mut rng = rand::thread_rng();
    (0..SESSION_ID_LEN)
        .map(|_| char::from(SESSION_ID_ALPHABET[rng.gen_range(0..SESSION_ID_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo_core::{Color, Phase, ScriptedDice};
    use std::thread;

    #[test]
    fn test_session_ids_are_six_uppercase_alphanumerics() {
        let id = generate_session_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_create_seats_default_players() {
        let manager = SessionManager::default();
        let id = manager.create_game(None).unwrap();
        let session = manager.get_session(&id).unwrap();

        assert_eq!(session.player_count(), 4);
        let snapshot = session.snapshot();
        assert_eq!(*snapshot.phase(), Phase::WaitingForRoll);
        assert_eq!(snapshot.players()[3].name(), "Yellow");
    }

    #[test]
    fn test_create_with_too_many_players_fails() {
        let manager = SessionManager::default();
        let players = vec![PlayerSpec::human("P", Color::Red); 5];
        assert_eq!(
            manager.create_game(Some(players)),
            Err(GameError::CapacityExceeded)
        );
        assert!(manager.list_sessions().is_empty());
    }

    #[test]
    fn test_remove_session() {
        let manager = SessionManager::default();
        let id = manager.create_game(None).unwrap();
        assert!(manager.remove_session(&id));
        assert!(!manager.remove_session(&id));
        assert!(manager.get_session(&id).is_none());
    }

    #[test]
    fn test_bot_replies_after_human_move() {
        let manager = SessionManager::default();
        let mut game = Game::with_dice(ScriptedDice::new([6, 2]));
        game.add_player(PlayerSpec::human("Ann", Color::Green)).unwrap();
        game.add_player(PlayerSpec::bot("Bot", Color::Red)).unwrap();
        let id = manager.insert_game(game);
        let session = manager.get_session(&id).unwrap();

        session.roll(0).unwrap();
        session.make_move(0, 0).unwrap();
        session.roll(0).unwrap();
        session.make_move(0, 0).unwrap();

        // Bot rolled 6, spawned, rolled 2, advanced; now Ann again.
        let snapshot = session.snapshot();
        assert_eq!(*snapshot.current_turn(), 0);
        assert_eq!(*snapshot.players()[1].pieces()[0].progress(), 2);
    }

    #[test]
    fn test_sessions_are_independent_across_threads() {
        let manager = SessionManager::default();
        let ids: Vec<_> = (0..8).map(|_| manager.create_game(None).unwrap()).collect();

        let handles: Vec<_> = ids
            .iter()
            .cloned()
            .map(|id| {
                let manager = manager.clone();
                thread::spawn(move || {
                    let session = manager.get_session(&id).unwrap();
                    for _ in 0..50 {
                        let current = *session.snapshot().current_turn();
                        if let Ok(roll) = session.roll(current) {
                            if !roll.is_forfeited() {
                                let snapshot = session.snapshot();
                                let piece = snapshot.legal_moves()[0];
                                session.make_move(current, piece).unwrap();
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(manager.list_sessions().len(), 8);
    }
}
