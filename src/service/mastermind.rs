use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::error::AppError;
use crate::game::{GameKind, GameSession, MastermindSession, ThreadRngRoller};
use crate::validate::mastermind::{create_request, move_request};

use super::{wrong_kind, GameService, MoveReply, SessionBackend};

pub struct MastermindService {
    backend: SessionBackend,
}

impl MastermindService {
    pub fn new(backend: SessionBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl GameService for MastermindService {
    fn kind(&self) -> GameKind {
        GameKind::Mastermind
    }

    fn backend(&self) -> &SessionBackend {
        &self.backend
    }

    #[instrument(skip_all)]
    async fn create_game(&self, request: &Value) -> Result<GameSession, AppError> {
        let player = create_request(request)?;
        // The thread-local rng must be gone before the next await.
        let session = {
            let mut roller = ThreadRngRoller::new();
            GameSession::from(MastermindSession::new(player, &mut roller))
        };

        self.backend.store.create(&session).await?;
        tracing::info!(session_id = %session.session_id(), "Mastermind session created");
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn update_game(&self, request: &Value) -> Result<MoveReply, AppError> {
        let request = move_request(request)?;
        let kind = self.kind();
        let session_id = request.session_id;

        self.backend
            .run_move(kind, session_id, |session| match session {
                GameSession::Mastermind(mut game) => {
                    let outcome = game.apply_move(request.guess);
                    tracing::debug!(%session_id, ?outcome, "Guess scored");
                    Ok((game.into(), outcome))
                }
                other => Err(wrong_kind(kind, &other)),
            })
            .await
    }
}
