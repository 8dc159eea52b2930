pub mod connect_four;
pub mod mancala;
pub mod mastermind;
pub mod roller;
pub mod scoreboard;
pub mod session;
pub mod types;

pub use connect_four::ConnectFourSession;
pub use mancala::MancalaSession;
pub use mastermind::MastermindSession;
pub use roller::{Roller, ThreadRngRoller};
pub use scoreboard::{ScoreBoards, ScoreEntry, TopNScoreBoard};
pub use session::GameSession;
pub use types::{GameError, GameKind, MoveOutcome, PlayerId, Seat, SessionId};
