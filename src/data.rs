use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::AppError;
use crate::game::{GameKind, GameSession, SessionId};

// --- Repository trait ---

/// Key-value persistence for sessions, keyed by game kind and session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session and adds it to its kind's index.
    async fn create(&self, session: &GameSession) -> Result<(), AppError>;

    async fn get(&self, kind: GameKind, id: SessionId) -> Result<GameSession, AppError>;

    /// Overwrites the stored session.
    async fn put(&self, session: &GameSession) -> Result<(), AppError>;

    /// Returns whether anything was removed.
    async fn delete(&self, kind: GameKind, id: SessionId) -> Result<bool, AppError>;

    async fn list(&self, kind: GameKind) -> Result<Vec<GameSession>, AppError>;
}

fn check_kind(expected: GameKind, session: GameSession) -> Result<GameSession, AppError> {
    let found = session.kind();
    if found == expected {
        Ok(session)
    } else {
        Err(AppError::CorruptSession {
            id: session.session_id(),
            expected,
            found,
        })
    }
}

// --- Redis ---

fn session_key(kind: GameKind, id: impl std::fmt::Display) -> String {
    format!("session:{}:{}", kind.slug(), id)
}

fn index_key(kind: GameKind) -> String {
    format!("sessions:{}", kind.slug())
}

pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> Result<MultiplexedConnection, AppError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    #[instrument(skip_all, fields(session_id = %session.session_id()))]
    async fn create(&self, session: &GameSession) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        let kind = session.kind();
        let id = session.session_id();
        let session_json = serde_json::to_string(session)?;

        redis::pipe()
            .atomic()
            .set(session_key(kind, id), session_json)
            .ignore()
            .sadd(index_key(kind), id.to_string())
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, kind: GameKind, id: SessionId) -> Result<GameSession, AppError> {
        let mut conn = self.connection().await?;
        let session_json: Option<String> = conn.get(session_key(kind, id)).await?;
        let session_json = session_json.ok_or(AppError::SessionNotFound(kind, id))?;

        let session: GameSession = serde_json::from_str(&session_json)?;
        check_kind(kind, session)
    }

    #[instrument(skip_all, fields(session_id = %session.session_id()))]
    async fn put(&self, session: &GameSession) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        let key = session_key(session.kind(), session.session_id());
        let session_json = serde_json::to_string(session)?;

        conn.set::<_, _, ()>(&key, session_json).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: GameKind, id: SessionId) -> Result<bool, AppError> {
        let mut conn = self.connection().await?;
        let (removed, _): (u32, u32) = redis::pipe()
            .atomic()
            .del(session_key(kind, id))
            .srem(index_key(kind), id.to_string())
            .query_async(&mut conn)
            .await?;
        Ok(removed > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self, kind: GameKind) -> Result<Vec<GameSession>, AppError> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn.smembers(index_key(kind)).await?;

        let mut sessions = Vec::with_capacity(ids.len());
        for id in ids {
            let session_json: Option<String> = conn.get(session_key(kind, &id)).await?;
            match session_json {
                Some(session_json) => {
                    let session: GameSession = serde_json::from_str(&session_json)?;
                    sessions.push(check_kind(kind, session)?);
                }
                None => tracing::warn!(session_id = %id, "Indexed session has no record."),
            }
        }
        Ok(sessions)
    }
}

// --- In-memory ---

/// Process-local store, used when `database.backend = "memory"` and by tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<(GameKind, SessionId), GameSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &GameSession) -> Result<(), AppError> {
        self.put(session).await
    }

    async fn get(&self, kind: GameKind, id: SessionId) -> Result<GameSession, AppError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&(kind, id))
            .cloned()
            .ok_or(AppError::SessionNotFound(kind, id))?;
        check_kind(kind, session)
    }

    async fn put(&self, session: &GameSession) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .insert((session.kind(), session.session_id()), session.clone());
        Ok(())
    }

    async fn delete(&self, kind: GameKind, id: SessionId) -> Result<bool, AppError> {
        Ok(self.sessions.write().await.remove(&(kind, id)).is_some())
    }

    async fn list(&self, kind: GameKind) -> Result<Vec<GameSession>, AppError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .iter()
            .filter(|((stored_kind, _), _)| *stored_kind == kind)
            .map(|(_, session)| session.clone())
            .collect())
    }
}
