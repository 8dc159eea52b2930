use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)] // Serialize directly as the inner UUID string
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The three games the arcade hosts.
///
/// Requests still carry the legacy numeric `game_id` selector, so each kind
/// knows its selector as well as the slug used in URLs and store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Mastermind,
    ConnectFour,
    Mancala,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Mastermind, GameKind::ConnectFour, GameKind::Mancala];

    pub fn selector(self) -> i64 {
        match self {
            GameKind::Mastermind => 0,
            GameKind::ConnectFour => 1,
            GameKind::Mancala => 2,
        }
    }

    pub fn from_selector(selector: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.selector() == selector)
    }

    pub fn slug(self) -> &'static str {
        match self {
            GameKind::Mastermind => "mastermind",
            GameKind::ConnectFour => "connect-four",
            GameKind::Mancala => "mancala",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Position of a player in a two-player session. `A` is the session creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    A,
    B,
}

impl Seat {
    pub fn other(self) -> Self {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }
}

/// Rule violations detected by an engine. These never abort a request; they are
/// reported back inside a [`MoveOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum GameError {
    #[error("column {0} is full")]
    ColumnFull(u8),
    #[error("column {0} does not exist")]
    NoSuchColumn(u8),
    #[error("the game is already over")]
    AlreadyOver,
    #[error("hole ({row}, {column}) does not exist")]
    NoSuchHole { row: u8, column: u8 },
    #[error("hole ({row}, {column}) is a store")]
    StoreHole { row: u8, column: u8 },
    #[error("hole ({row}, {column}) is empty")]
    EmptyHole { row: u8, column: u8 },
    #[error("the game is finished")]
    GameFinished,
    #[error("player {0} is not part of this session")]
    NotAPlayer(PlayerId),
}

/// What a single call to an engine's `apply_move` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The move was applied and play goes on.
    Continue,
    /// The move ended the game with a winner. `moves` is the session's move counter.
    Won { winner: Option<PlayerId>, moves: u32 },
    /// The move ended the game without a winner.
    Drawn { moves: u32 },
    /// Connect Four's pass-through on a full column or finished game: the board
    /// is untouched but the turn owner flips and the session is written back.
    Acknowledged { reason: GameError },
    /// The move was refused and nothing changed.
    Rejected { reason: GameError },
}

impl MoveOutcome {
    pub fn mutates_session(&self) -> bool {
        !matches!(self, MoveOutcome::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_round_trip_through_kinds() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_selector(kind.selector()), Some(kind));
        }
        assert_eq!(GameKind::from_selector(3), None);
        assert_eq!(GameKind::from_selector(-1), None);
    }

    #[test]
    fn test_game_kind_serializes_as_slug() {
        let json = serde_json::to_string(&GameKind::ConnectFour).unwrap();
        assert_eq!(json, "\"connect-four\"");
        let kind: GameKind = serde_json::from_str("\"mancala\"").unwrap();
        assert_eq!(kind, GameKind::Mancala);
    }

    #[test]
    fn test_session_ids_parse_back() {
        let id = SessionId::new();
        assert_eq!(SessionId::parse(&id.to_string()).unwrap(), id);
        assert!(SessionId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_seat_other_is_an_involution() {
        assert_eq!(Seat::A.other(), Seat::B);
        assert_eq!(Seat::B.other().other(), Seat::B);
    }
}
