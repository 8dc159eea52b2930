use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;
use crate::game::mastermind::Guess;
use crate::game::types::{GameKind, PlayerId, SessionId};

#[derive(Debug, Deserialize, Validate)]
pub struct MastermindCreateRequest {
    pub game_id: i64,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MastermindMoveRequest {
    pub session_id: SessionId,
    #[validate(length(equal = 4))]
    pub guess: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MastermindMove {
    pub session_id: SessionId,
    pub guess: Guess,
}

pub fn create_request(raw: &Value) -> Result<Option<PlayerId>, AppError> {
    let request: MastermindCreateRequest = super::parse(raw)?;
    super::expect_selector(request.game_id, GameKind::Mastermind)?;
    Ok(request.user_id.map(PlayerId::new))
}

pub fn move_request(raw: &Value) -> Result<MastermindMove, AppError> {
    let request: MastermindMoveRequest = super::parse(raw)?;
    let guess = Guess::try_from(request.guess)
        .map_err(|guess| AppError::InvalidRequest(format!("guess {:?} needs 4 values", guess)))?;
    Ok(MastermindMove {
        session_id: request.session_id,
        guess,
    })
}
