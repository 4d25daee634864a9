//! Ludo server library - sessions, bots and the HTTP transport
//!
//! # Architecture
//!
//! - **Session**: one engine per session id behind its own lock, in a keyed registry
//! - **Bot**: strategies that play seats flagged as bots
//! - **Server**: axum router speaking a `status`/`data` JSON envelope
//! - **Simulate**: headless all-bot games
//!
//! # Example
//!
//! ```no_run
//! use ludo_server::{AppState, ServerConfig, SessionManager, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let app = router(AppState::new(SessionManager::new(&config)));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod bot;
mod config;
mod error;
mod server;
mod session;
mod simulate;

// Crate-level exports - Bots
pub use bot::{BotKind, BotStrategy, FirstMoveBot, GreedyBot, MAX_BOT_ACTIONS, play_bot_turns};

// Crate-level exports - Configuration
pub use config::{ServerConfig, default_players};

// Crate-level exports - Errors
pub use error::{ApiError, ConfigError};

// Crate-level exports - HTTP transport
pub use server::{
    AppState, CreateGameRequest, CreateGameResponse, Envelope, JoinResponse, MoveRequest,
    MoveResponse, RollRequest, RollResponse, router, serve,
};

// Crate-level exports - Session management
pub use session::{GameSession, SessionId, SessionManager};

// Crate-level exports - Simulation
pub use simulate::{Simulation, SimulationReport};
