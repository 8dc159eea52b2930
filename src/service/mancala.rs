use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::error::AppError;
use crate::game::{GameKind, GameSession, MancalaSession};
use crate::validate::mancala::{create_request, move_request};

use super::{wrong_kind, GameService, MoveReply, SessionBackend};

pub struct MancalaService {
    backend: SessionBackend,
    stones_per_hole: u32,
}

impl MancalaService {
    pub fn new(backend: SessionBackend, stones_per_hole: u32) -> Self {
        Self {
            backend,
            stones_per_hole,
        }
    }
}

#[async_trait]
impl GameService for MancalaService {
    fn kind(&self) -> GameKind {
        GameKind::Mancala
    }

    fn backend(&self) -> &SessionBackend {
        &self.backend
    }

    #[instrument(skip_all)]
    async fn create_game(&self, request: &Value) -> Result<GameSession, AppError> {
        let (player_a, player_b) = create_request(request)?;
        let session = GameSession::from(MancalaSession::new(player_a, player_b, self.stones_per_hole));

        self.backend.store.create(&session).await?;
        tracing::info!(session_id = %session.session_id(), stones_per_hole = self.stones_per_hole, "Mancala session created");
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn update_game(&self, request: &Value) -> Result<MoveReply, AppError> {
        let request = move_request(request)?;
        let kind = self.kind();
        let session_id = request.session_id;

        self.backend
            .run_move(kind, session_id, |session| match session {
                GameSession::Mancala(mut game) => {
                    let outcome = game.apply_move(request.row, request.column, &request.player);
                    tracing::debug!(%session_id, ?outcome, "Mancala move applied");
                    Ok((game.into(), outcome))
                }
                other => Err(wrong_kind(kind, &other)),
            })
            .await
    }
}
