//! Game-facing operations: validate the raw request, run the engine, persist,
//! and keep the scoreboards current. One [`GameService`] per game kind.

pub mod connect_four;
pub mod mancala;
pub mod mastermind;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::config::GamesConfig;
use crate::data::SessionStore;
use crate::error::AppError;
use crate::game::{GameKind, GameSession, MoveOutcome, PlayerId, ScoreBoards, ScoreEntry, SessionId};
use crate::state::MoveLocks;
use crate::validate;

pub use connect_four::ConnectFourService;
pub use mancala::MancalaService;
pub use mastermind::MastermindService;

/// Result of an update: the session as stored afterwards and what the move did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReply {
    pub session: GameSession,
    pub outcome: MoveOutcome,
}

/// Optional listing filters. Both may be given, in which case both apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFilter {
    pub player: Option<String>,
    pub invited: Option<String>,
}

impl SessionFilter {
    fn matches(&self, session: &GameSession) -> bool {
        let involved = self
            .player
            .as_ref()
            .is_none_or(|player| session.involves(&PlayerId::new(player.as_str())));
        let invited = self
            .invited
            .as_ref()
            .is_none_or(|player| session.invited(&PlayerId::new(player.as_str())));
        involved && invited
    }
}

/// Collaborators shared by every game service.
#[derive(Clone)]
pub struct SessionBackend {
    pub store: Arc<dyn SessionStore>,
    pub scores: Arc<ScoreBoards>,
    pub locks: Arc<MoveLocks>,
}

impl SessionBackend {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            scores: Arc::new(ScoreBoards::default()),
            locks: Arc::new(MoveLocks::default()),
        }
    }

    /// Runs one move against the stored session while holding its move lock.
    /// The lock entry is dropped afterwards unless another move is waiting on it.
    pub async fn run_move<F>(&self, kind: GameKind, id: SessionId, play: F) -> Result<MoveReply, AppError>
    where
        F: FnOnce(GameSession) -> Result<(GameSession, MoveOutcome), AppError> + Send,
    {
        let guard = self.locks.acquire(id).await;
        let reply = async {
            let session = self.store.get(kind, id).await?;
            let (session, outcome) = play(session)?;
            self.commit(session, outcome).await
        }
        .await;
        drop(guard);
        self.locks.release_idle(id).await;
        reply
    }

    /// Writes back any session the move touched and ranks finished games.
    #[instrument(skip_all, fields(session_id = %session.session_id()))]
    pub async fn commit(&self, session: GameSession, outcome: MoveOutcome) -> Result<MoveReply, AppError> {
        if outcome.mutates_session() {
            self.store.put(&session).await?;
        }
        if let MoveOutcome::Won { moves, .. } = &outcome {
            self.scores
                .record(session.kind(), *moves, session.session_id().to_string())
                .await;
        }
        Ok(MoveReply { session, outcome })
    }
}

pub(crate) fn wrong_kind(expected: GameKind, session: &GameSession) -> AppError {
    AppError::CorruptSession {
        id: session.session_id(),
        expected,
        found: session.kind(),
    }
}

#[async_trait]
pub trait GameService: Send + Sync {
    fn kind(&self) -> GameKind;

    fn backend(&self) -> &SessionBackend;

    async fn create_game(&self, request: &Value) -> Result<GameSession, AppError>;

    async fn update_game(&self, request: &Value) -> Result<MoveReply, AppError>;

    async fn read_game(&self, request: &Value) -> Result<GameSession, AppError> {
        let id = validate::session_request(request)?;
        self.backend().store.get(self.kind(), id).await
    }

    /// Deleting an unknown id is not an error; the id is echoed back either way.
    async fn delete_game(&self, request: &Value) -> Result<SessionId, AppError> {
        let id = validate::session_request(request)?;
        let backend = self.backend();

        let guard = backend.locks.acquire(id).await;
        let removed = backend.store.delete(self.kind(), id).await?;
        drop(guard);
        backend.locks.release(id).await;

        tracing::info!(kind = %self.kind(), session_id = %id, removed, "Session deleted");
        Ok(id)
    }

    async fn high_scores(&self) -> Vec<ScoreEntry> {
        self.backend().scores.top(self.kind()).await
    }

    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<GameSession>, AppError> {
        let sessions = self.backend().store.list(self.kind()).await?;
        Ok(sessions
            .into_iter()
            .filter(|session| filter.matches(session))
            .collect())
    }
}

/// The three game services over one shared backend.
pub struct Arcade {
    connect_four: ConnectFourService,
    mancala: MancalaService,
    mastermind: MastermindService,
}

impl Arcade {
    pub fn new(store: Arc<dyn SessionStore>, games: &GamesConfig) -> Self {
        let backend = SessionBackend::new(store);
        Self {
            connect_four: ConnectFourService::new(backend.clone()),
            mancala: MancalaService::new(backend.clone(), games.mancala_stones_per_hole),
            mastermind: MastermindService::new(backend),
        }
    }

    pub fn service(&self, kind: GameKind) -> &dyn GameService {
        match kind {
            GameKind::ConnectFour => &self.connect_four,
            GameKind::Mancala => &self.mancala,
            GameKind::Mastermind => &self.mastermind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemorySessionStore;
    use serde_json::json;

    fn arcade() -> Arcade {
        Arcade::new(Arc::new(InMemorySessionStore::new()), &GamesConfig::default())
    }

    #[test]
    fn test_arcade_routes_each_kind() {
        let arcade = arcade();
        for kind in GameKind::ALL {
            assert_eq!(arcade.service(kind).kind(), kind);
        }
    }

    #[tokio::test]
    async fn test_delete_echoes_id_and_forgets_session() {
        let arcade = arcade();
        let service = arcade.service(GameKind::ConnectFour);
        let session = service
            .create_game(&json!({ "game_id": 1, "user_id": "a", "opponent_id": "b" }))
            .await
            .unwrap();
        let request = json!({ "session_id": session.session_id() });

        let deleted = service.delete_game(&request).await.unwrap();

        assert_eq!(deleted, session.session_id());
        assert!(matches!(
            service.read_game(&request).await,
            Err(AppError::SessionNotFound(GameKind::ConnectFour, _))
        ));
        assert_eq!(service.delete_game(&request).await.unwrap(), deleted);
    }

    #[tokio::test]
    async fn test_sessions_are_not_shared_across_kinds() {
        let arcade = arcade();
        let session = arcade
            .service(GameKind::Mancala)
            .create_game(&json!({ "game_id": 2, "user_id": "a", "opponent_id": "b" }))
            .await
            .unwrap();

        let read = arcade
            .service(GameKind::ConnectFour)
            .read_game(&json!({ "session_id": session.session_id() }))
            .await;

        assert!(matches!(read, Err(AppError::SessionNotFound(..))));
    }

    #[tokio::test]
    async fn test_list_filters_by_player_and_invitation() {
        let arcade = arcade();
        let service = arcade.service(GameKind::ConnectFour);
        for (host, guest) in [("ann", "bob"), ("bob", "cid"), ("cid", "ann")] {
            service
                .create_game(&json!({ "game_id": 1, "user_id": host, "opponent_id": guest }))
                .await
                .unwrap();
        }

        let all = service.list_sessions(&SessionFilter::default()).await.unwrap();
        let with_bob = service
            .list_sessions(&SessionFilter {
                player: Some("bob".into()),
                invited: None,
            })
            .await
            .unwrap();
        let bob_invited = service
            .list_sessions(&SessionFilter {
                player: None,
                invited: Some("bob".into()),
            })
            .await
            .unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(with_bob.len(), 2);
        assert_eq!(bob_invited.len(), 1);
        assert!(bob_invited[0].invited(&PlayerId::new("bob")));
    }

    #[tokio::test]
    async fn test_moves_on_unknown_sessions_leave_no_locks() {
        let arcade = arcade();
        let service = arcade.service(GameKind::ConnectFour);

        for _ in 0..50 {
            let result = service
                .update_game(&json!({ "session_id": SessionId::new(), "player_num": "a", "column": 1 }))
                .await;
            assert!(matches!(result, Err(AppError::SessionNotFound(..))));
        }

        assert_eq!(service.backend().locks.len().await, 0);
    }

    #[tokio::test]
    async fn test_completed_moves_leave_no_locks() {
        let arcade = arcade();
        let service = arcade.service(GameKind::ConnectFour);
        let session = service
            .create_game(&json!({ "game_id": 1, "user_id": "a", "opponent_id": "b" }))
            .await
            .unwrap();

        service
            .update_game(&json!({ "session_id": session.session_id(), "player_num": "a", "column": 1 }))
            .await
            .unwrap();

        assert_eq!(service.backend().locks.len().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_requests_never_reach_the_store() {
        let arcade = arcade();
        let service = arcade.service(GameKind::Mancala);

        let result = service.create_game(&json!({ "game_id": 1, "user_id": "a", "opponent_id": "b" })).await;

        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert!(service.list_sessions(&SessionFilter::default()).await.unwrap().is_empty());
    }
}
