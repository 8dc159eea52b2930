use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use crate::game::types::{GameKind, SessionId};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0} session {1} not found")]
    SessionNotFound(GameKind, SessionId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session {id} holds a {found} game, expected {expected}")]
    CorruptSession {
        id: SessionId,
        expected: GameKind,
        found: GameKind,
    },
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::InvalidRequest(format!("validation failed: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal database error occurred" }),
                )
            }
            AppError::Serde(e) => {
                tracing::error!("Serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal serialization error occurred" }),
                )
            }
            AppError::CorruptSession { id, expected, found } => {
                tracing::error!(session_id = %id, %expected, %found, "Stored session has the wrong game type");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal storage error occurred" }),
                )
            }
            AppError::SessionNotFound(kind, id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{} session {} not found", kind, id) }),
            ),
            AppError::InvalidRequest(reason) => {
                // Callers only ever see the sentinel; the reason stays in the logs.
                tracing::warn!("Invalid request: {}", reason);
                (StatusCode::BAD_REQUEST, json!({ "session_id": 0 }))
            }
        };

        (status, Json(body)).into_response()
    }
}
