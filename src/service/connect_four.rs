use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::error::AppError;
use crate::game::{ConnectFourSession, GameKind, GameSession};
use crate::validate::connect_four::{create_request, move_request};

use super::{wrong_kind, GameService, MoveReply, SessionBackend};

pub struct ConnectFourService {
    backend: SessionBackend,
}

impl ConnectFourService {
    pub fn new(backend: SessionBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl GameService for ConnectFourService {
    fn kind(&self) -> GameKind {
        GameKind::ConnectFour
    }

    fn backend(&self) -> &SessionBackend {
        &self.backend
    }

    #[instrument(skip_all)]
    async fn create_game(&self, request: &Value) -> Result<GameSession, AppError> {
        let (player_a, player_b) = create_request(request)?;
        let session = GameSession::from(ConnectFourSession::new(player_a, player_b));

        self.backend.store.create(&session).await?;
        tracing::info!(session_id = %session.session_id(), "Connect Four session created");
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn update_game(&self, request: &Value) -> Result<MoveReply, AppError> {
        let request = move_request(request)?;
        let kind = self.kind();
        let session_id = request.session_id;

        self.backend
            .run_move(kind, session_id, |session| match session {
                GameSession::ConnectFour(mut game) => {
                    let outcome = game.apply_move(request.column, &request.player);
                    tracing::debug!(%session_id, ?outcome, "Connect Four move applied");
                    Ok((game.into(), outcome))
                }
                other => Err(wrong_kind(kind, &other)),
            })
            .await
    }
}
