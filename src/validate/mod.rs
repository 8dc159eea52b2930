//! Request gatekeepers. Each function takes the raw JSON body of a call and
//! either returns a typed request or [`AppError::InvalidRequest`]. Nothing here
//! touches the store.

pub mod connect_four;
pub mod mancala;
pub mod mastermind;

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;
use crate::game::types::{GameKind, PlayerId, SessionId};

/// Deserializes `raw` into `T` and runs its validation rules.
///
/// Integer fields are declared as `i64`, so floats and strings fail here
/// rather than being coerced.
pub fn parse<T>(raw: &Value) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let request = T::deserialize(raw).map_err(|err| AppError::InvalidRequest(err.to_string()))?;
    request.validate()?;
    Ok(request)
}

pub fn expect_selector(game_id: i64, kind: GameKind) -> Result<(), AppError> {
    if game_id == kind.selector() {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!(
            "game_id {} does not select {}",
            game_id, kind
        )))
    }
}

/// Body of read and delete calls.
#[derive(Debug, Deserialize, Validate)]
pub struct SessionRequest {
    pub session_id: SessionId,
}

pub fn session_request(raw: &Value) -> Result<SessionId, AppError> {
    parse::<SessionRequest>(raw).map(|request| request.session_id)
}

/// Create body shared by the two-player games.
#[derive(Debug, Deserialize, Validate)]
pub struct PlayersRequest {
    pub game_id: i64,
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub opponent_id: String,
}

/// Validated players of a new two-player session, creator first.
pub fn players_request(raw: &Value, kind: GameKind) -> Result<(PlayerId, PlayerId), AppError> {
    let request: PlayersRequest = parse(raw)?;
    expect_selector(request.game_id, kind)?;
    Ok((PlayerId::new(request.user_id), PlayerId::new(request.opponent_id)))
}
