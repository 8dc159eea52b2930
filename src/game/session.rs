use serde::{Deserialize, Serialize};

use super::connect_four::ConnectFourSession;
use super::mancala::MancalaSession;
use super::mastermind::MastermindSession;
use super::types::{GameKind, PlayerId, SessionId};

/// Any stored session, tagged with the game it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "kebab-case")]
pub enum GameSession {
    ConnectFour(ConnectFourSession),
    Mancala(MancalaSession),
    Mastermind(MastermindSession),
}

impl GameSession {
    pub fn kind(&self) -> GameKind {
        match self {
            GameSession::ConnectFour(_) => GameKind::ConnectFour,
            GameSession::Mancala(_) => GameKind::Mancala,
            GameSession::Mastermind(_) => GameKind::Mastermind,
        }
    }

    pub fn session_id(&self) -> SessionId {
        match self {
            GameSession::ConnectFour(game) => game.get_id(),
            GameSession::Mancala(game) => game.get_id(),
            GameSession::Mastermind(game) => game.get_id(),
        }
    }

    /// True when `player` takes part in the session.
    pub fn involves(&self, player: &PlayerId) -> bool {
        match self {
            GameSession::ConnectFour(game) => game.get_players().contains(player),
            GameSession::Mancala(game) => game.get_players().contains(player),
            GameSession::Mastermind(game) => game.get_player() == Some(player),
        }
    }

    /// True when `player` was invited, i.e. sits in the second seat.
    /// Mastermind is single player, so its only player counts as invited to nothing.
    pub fn invited(&self, player: &PlayerId) -> bool {
        match self {
            GameSession::ConnectFour(game) => &game.get_players()[1] == player,
            GameSession::Mancala(game) => &game.get_players()[1] == player,
            GameSession::Mastermind(_) => false,
        }
    }
}

impl From<ConnectFourSession> for GameSession {
    fn from(game: ConnectFourSession) -> Self {
        GameSession::ConnectFour(game)
    }
}

impl From<MancalaSession> for GameSession {
    fn from(game: MancalaSession) -> Self {
        GameSession::Mancala(game)
    }
}

impl From<MastermindSession> for GameSession {
    fn from(game: MastermindSession) -> Self {
        GameSession::Mastermind(game)
    }
}
