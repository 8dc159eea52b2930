use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
    error::AppError,
    game::{GameKind, GameSession, ScoreEntry, SessionId},
    service::{MoveReply, SessionFilter},
    state::SharedState,
};

// --- DTOs (Data Transfer Objects) ---
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteGameResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HighScoresResponse {
    pub scores: Vec<ScoreEntry>,
}

/// Malformed JSON gets the same sentinel reply as a failed validation.
fn body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

/// An unknown game slug or unparsable path also gets the sentinel reply.
fn path<T>(segments: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    segments
        .map(|Path(value)| value)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

// ==============================================================================
// === REST API Handlers
// =============================================================================

#[instrument(skip(state, payload))]
pub async fn create_game_handler(
    State(state): State<SharedState>,
    kind: Result<Path<GameKind>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<GameSession>), AppError> {
    let kind = path(kind)?;
    let request = body(payload)?;
    let session = state.arcade.service(kind).create_game(&request).await?;

    tracing::info!(%kind, session_id = %session.session_id(), "Game created successfully");
    Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(skip(state))]
pub async fn list_sessions_handler(
    State(state): State<SharedState>,
    kind: Result<Path<GameKind>, PathRejection>,
    Query(filter): Query<SessionFilter>,
) -> Result<Json<Vec<GameSession>>, AppError> {
    let kind = path(kind)?;
    let sessions = state.arcade.service(kind).list_sessions(&filter).await?;
    Ok(Json(sessions))
}

#[instrument(skip(state))]
pub async fn get_game_handler(
    State(state): State<SharedState>,
    segments: Result<Path<(GameKind, String)>, PathRejection>,
) -> Result<Json<GameSession>, AppError> {
    let (kind, session_id) = path(segments)?;
    let session = state
        .arcade
        .service(kind)
        .read_game(&json!({ "session_id": session_id }))
        .await?;
    Ok(Json(session))
}

/// The session id in the path replaces any `session_id` in the body.
#[instrument(skip(state, payload))]
pub async fn move_handler(
    State(state): State<SharedState>,
    segments: Result<Path<(GameKind, String)>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MoveReply>, AppError> {
    let (kind, session_id) = path(segments)?;
    let mut request = body(payload)?;
    let fields = request
        .as_object_mut()
        .ok_or_else(|| AppError::InvalidRequest("move body must be an object".into()))?;
    fields.insert("session_id".into(), Value::String(session_id));

    let reply = state.arcade.service(kind).update_game(&request).await?;
    Ok(Json(reply))
}

#[instrument(skip(state))]
pub async fn delete_game_handler(
    State(state): State<SharedState>,
    segments: Result<Path<(GameKind, String)>, PathRejection>,
) -> Result<Json<DeleteGameResponse>, AppError> {
    let (kind, session_id) = path(segments)?;
    let session_id = state
        .arcade
        .service(kind)
        .delete_game(&json!({ "session_id": session_id }))
        .await?;
    Ok(Json(DeleteGameResponse { session_id }))
}

#[instrument(skip(state))]
pub async fn high_scores_handler(
    State(state): State<SharedState>,
    kind: Result<Path<GameKind>, PathRejection>,
) -> Result<Json<HighScoresResponse>, AppError> {
    let kind = path(kind)?;
    let scores = state.arcade.service(kind).high_scores().await;
    Ok(Json(HighScoresResponse { scores }))
}
