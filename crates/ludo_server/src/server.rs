//! HTTP transport over the session registry.
//!
//! Every API response is wrapped in an [`Envelope`] and carries permissive
//! CORS headers.

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::session::{GameSession, SessionId, SessionManager};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router, middleware};
use derive_new::new;
use ludo_core::{GameSnapshot, PlayerId, PlayerSpec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// JSON wrapper shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    /// The call succeeded.
    Success {
        /// Endpoint payload.
        data: T,
    },
    /// The call failed.
    Error {
        /// Human readable reason.
        message: String,
    },
}

impl<T> Envelope<T> {
    /// Wraps a payload.
    pub fn success(data: T) -> Self {
        Envelope::Success { data }
    }

    /// Wraps an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
        }
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope::success(data)))
}

/// Optional body of `POST /game/create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Seats to fill, in turn order.
    #[serde(default)]
    pub players: Vec<PlayerSpec>,
}

/// Reply to `POST /game/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    /// Id of the new session.
    pub game_id: SessionId,
}

/// Reply to `POST /game/{id}/players`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    /// Seat assigned to the new player.
    pub player_id: PlayerId,
}

/// Body of `POST /game/{id}/roll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    /// Player rolling.
    pub player_id: PlayerId,
}

/// Reply to `POST /game/{id}/roll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollResponse {
    /// Die value.
    pub roll: u8,
    /// True when no move was possible and the turn passed.
    pub forfeited: bool,
}

/// Body of `POST /game/{id}/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Player moving.
    pub player_id: PlayerId,
    /// Piece index, 0 to 3.
    pub piece_id: usize,
}

/// Reply to `POST /game/{id}/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    /// Always true on success.
    pub moved: bool,
    /// Whether an opponent was sent back to base.
    pub captured: bool,
    /// Whether the piece reached home.
    pub reached_home: bool,
    /// The mover rolled a six and goes again.
    pub extra_turn: bool,
    /// Winner, once the game is over.
    pub winner: Option<PlayerId>,
}

/// Shared handler state.
#[derive(Debug, Clone, new)]
pub struct AppState {
    sessions: SessionManager,
}

impl AppState {
    fn session(&self, id: &str) -> Result<Arc<GameSession>, ApiError> {
        self.sessions
            .get_session(id)
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))
    }
}

/// Builds the API router.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    info!("Building API router");
    Router::new()
        .route("/api/v1/game/create", post(create_game).options(preflight))
        .route("/api/v1/games", get(list_games).options(preflight))
        .route("/api/v1/game/{id}", delete(delete_game).options(preflight))
        .route("/api/v1/game/{id}/state", get(game_state).options(preflight))
        .route("/api/v1/game/{id}/players", post(join_game).options(preflight))
        .route("/api/v1/game/{id}/roll", post(roll_dice).options(preflight))
        .route("/api/v1/game/{id}/move", post(make_move).options(preflight))
        .route("/api/v1/game/{id}/reset", post(reset_game).options(preflight))
        .layer(middleware::map_response(add_cors_headers))
        .with_state(state)
}

/// Binds the configured address and serves until the process stops.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(SessionManager::new(&config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        "Server ready at http://{}:{}/api/v1/",
        config.host(),
        config.port()
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

async fn preflight() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

#[instrument(skip(state, body), fields(body_len = body.len()))]
async fn create_game(State(state): State<AppState>, body: Bytes) -> ApiResult<CreateGameResponse> {
    let players = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let request: CreateGameRequest = parse_body(&body)?;
        Some(request.players).filter(|players| !players.is_empty())
    };

    let game_id = state.sessions.create_game(players)?;
    info!(game_id = %game_id, "Game created");
    ok(CreateGameResponse { game_id })
}

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> ApiResult<Vec<SessionId>> {
    ok(state.sessions.list_sessions())
}

#[instrument(skip(state))]
async fn game_state(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<GameSnapshot> {
    ok(state.session(&id)?.snapshot())
}

#[instrument(skip(state, body))]
async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<JoinResponse> {
    let spec: PlayerSpec = parse_body(&body)?;
    let player_id = state.session(&id)?.add_player(spec)?;
    info!(session_id = %id, player_id, "Player joined");
    ok(JoinResponse { player_id })
}

#[instrument(skip(state, body))]
async fn roll_dice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<RollResponse> {
    let request: RollRequest = parse_body(&body)?;
    let roll = state.session(&id)?.roll(request.player_id)?;
    debug!(session_id = %id, player = request.player_id, roll = roll.value(), "Rolled");
    ok(RollResponse {
        roll: roll.value(),
        forfeited: roll.is_forfeited(),
    })
}

#[instrument(skip(state, body))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<MoveResponse> {
    let request: MoveRequest = parse_body(&body)?;
    let outcome = state
        .session(&id)?
        .make_move(request.player_id, request.piece_id)?;
    debug!(
        session_id = %id,
        player = request.player_id,
        piece = request.piece_id,
        to = %outcome.to,
        "Moved"
    );
    ok(MoveResponse {
        moved: true,
        captured: !outcome.captured.is_empty(),
        reached_home: outcome.reached_home,
        extra_turn: outcome.extra_turn,
        winner: outcome.winner,
    })
}

#[instrument(skip(state))]
async fn reset_game(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.session(&id)?.reset()?;
    info!(session_id = %id, "Game reset");
    ok(())
}

#[instrument(skip(state))]
async fn delete_game(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    if state.sessions.remove_session(&id) {
        ok(())
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}
