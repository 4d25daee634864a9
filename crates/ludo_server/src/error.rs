//! Error types for the server and its configuration.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error, From};
use ludo_core::GameError;
use tracing::{instrument, warn};

use crate::server::Envelope;

/// Failure of an API call.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ApiError {
    /// No session with this id.
    #[display("Game not found: {_0}")]
    #[from(ignore)]
    SessionNotFound(#[error(not(source))] String),
    /// The engine rejected the action.
    #[display("{_0}")]
    Game(GameError),
    /// The request body could not be decoded.
    #[display("Malformed request: {_0}")]
    #[from(ignore)]
    BadRequest(#[error(not(source))] String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Game(GameError::UnknownPlayer(_) | GameError::InvalidPieceIndex(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Game(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = %status, error = %self, "Request rejected");
        (status, Json(Envelope::<()>::error(self.to_string()))).into_response()
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
