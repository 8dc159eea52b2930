use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;
use crate::game::types::{GameKind, PlayerId, SessionId};

#[derive(Debug, Deserialize)]
pub struct MancalaMoveRequest {
    pub session_id: SessionId,
    pub player_num: String,
    pub row: i64,
    pub column: i64,
}

/// Accepts only the twelve playable holes: row 0 columns 1–6 and row 1 columns 0–5.
pub fn validate_hole(row: i64, column: i64) -> Result<(), ValidationError> {
    let playable = match row {
        0 => (1..=6).contains(&column),
        1 => (0..=5).contains(&column),
        _ => false,
    };
    if playable {
        return Ok(());
    }
    let mut err = ValidationError::new("mancala_hole");
    err.message = Some(format!("({}, {}) is not a playable hole", row, column).into());
    Err(err)
}

impl Validate for MancalaMoveRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.player_num.is_empty() {
            errors.add("player_num", ValidationError::new("length"));
        }
        if let Err(e) = validate_hole(self.row, self.column) {
            errors.add("column", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MancalaMove {
    pub session_id: SessionId,
    pub player: PlayerId,
    pub row: u8,
    pub column: u8,
}

pub fn create_request(raw: &Value) -> Result<(PlayerId, PlayerId), AppError> {
    super::players_request(raw, GameKind::Mancala)
}

pub fn move_request(raw: &Value) -> Result<MancalaMove, AppError> {
    let request: MancalaMoveRequest = super::parse(raw)?;
    // validate_hole has bounded both coordinates to 0..=6.
    Ok(MancalaMove {
        session_id: request.session_id,
        player: PlayerId::new(request.player_num),
        row: request.row as u8,
        column: request.column as u8,
    })
}
