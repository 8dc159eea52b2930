use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;
use crate::game::connect_four::COLUMNS;
use crate::game::types::{GameKind, PlayerId, SessionId};

#[derive(Debug, Deserialize, Validate)]
pub struct ConnectFourMoveRequest {
    pub session_id: SessionId,
    #[validate(length(min = 1))]
    pub player_num: String,
    /// Public, 1-based column.
    #[validate(range(min = 1, max = 7))]
    pub column: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectFourMove {
    pub session_id: SessionId,
    pub player: PlayerId,
    pub column: u8,
}

pub fn create_request(raw: &Value) -> Result<(PlayerId, PlayerId), AppError> {
    super::players_request(raw, GameKind::ConnectFour)
}

pub fn move_request(raw: &Value) -> Result<ConnectFourMove, AppError> {
    let request: ConnectFourMoveRequest = super::parse(raw)?;
    let column = u8::try_from(request.column)
        .ok()
        .filter(|column| usize::from(*column) <= COLUMNS)
        .ok_or_else(|| AppError::InvalidRequest(format!("column {} is out of range", request.column)))?;
    Ok(ConnectFourMove {
        session_id: request.session_id,
        player: PlayerId::new(request.player_num),
        column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(column: Value) -> Value {
        json!({ "session_id": SessionId::new(), "player_num": "a", "column": column })
    }

    #[test]
    fn test_columns_one_to_seven_pass() {
        for column in 1..=7 {
            let request = move_request(&body(json!(column))).unwrap();
            assert_eq!(request.column, column as u8);
            assert_eq!(request.player, PlayerId::new("a"));
        }
    }

    #[test]
    fn test_out_of_range_columns_are_rejected() {
        for column in [json!(0), json!(8), json!(-3)] {
            assert!(matches!(
                move_request(&body(column)),
                Err(AppError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_non_integer_columns_are_rejected() {
        for column in [json!(3.5), json!(3.0), json!("3"), json!(null)] {
            assert!(matches!(
                move_request(&body(column)),
                Err(AppError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_move_needs_every_field() {
        let request = json!({ "session_id": SessionId::new(), "column": 3 });
        assert!(matches!(
            move_request(&request),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_create_needs_connect_four_selector() {
        let (a, b) = create_request(&json!({ "game_id": 1, "user_id": "a", "opponent_id": "b" })).unwrap();
        assert_eq!((a.as_str(), b.as_str()), ("a", "b"));
        assert!(create_request(&json!({ "game_id": 0, "user_id": "a", "opponent_id": "b" })).is_err());
    }
}
