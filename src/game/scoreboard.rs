use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::types::GameKind;

pub const CAPACITY: usize = 10;
pub const EMPTY_LABEL: &str = "empty";

/// One ranking slot. `moves: None` is the "infinite" placeholder every slot starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub moves: Option<u32>,
    pub label: String,
}

impl ScoreEntry {
    fn placeholder() -> Self {
        Self {
            moves: None,
            label: EMPTY_LABEL.to_string(),
        }
    }

    /// Strictly fewer moves wins; a real score always beats a placeholder.
    fn beats(&self, other: &ScoreEntry) -> bool {
        match (self.moves, other.moves) {
            (Some(mine), Some(theirs)) => mine < theirs,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Fixed-size leaderboard kept in ascending move order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopNScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl Default for TopNScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TopNScoreBoard {
    pub fn new() -> Self {
        Self {
            entries: vec![ScoreEntry::placeholder(); CAPACITY],
        }
    }

    /// Inserts the score at its sorted position, carrying each displaced entry
    /// down the list until the worst one falls off the end.
    pub fn record(&mut self, moves: u32, label: impl Into<String>) {
        let mut carried = ScoreEntry {
            moves: Some(moves),
            label: label.into(),
        };
        for slot in self.entries.iter_mut() {
            if carried.beats(slot) {
                std::mem::swap(slot, &mut carried);
            }
        }
    }

    pub fn top(&self) -> &[ScoreEntry] {
        &self.entries
    }
}

/// The per-game leaderboards, owned by the application state.
#[derive(Debug, Default)]
pub struct ScoreBoards {
    mastermind: Mutex<TopNScoreBoard>,
    connect_four: Mutex<TopNScoreBoard>,
    mancala: Mutex<TopNScoreBoard>,
}

impl ScoreBoards {
    pub fn board(&self, kind: GameKind) -> &Mutex<TopNScoreBoard> {
        match kind {
            GameKind::Mastermind => &self.mastermind,
            GameKind::ConnectFour => &self.connect_four,
            GameKind::Mancala => &self.mancala,
        }
    }

    #[tracing::instrument(skip(self, label))]
    pub async fn record(&self, kind: GameKind, moves: u32, label: impl Into<String>) {
        self.board(kind).lock().await.record(moves, label);
    }

    pub async fn top(&self, kind: GameKind) -> Vec<ScoreEntry> {
        self.board(kind).lock().await.top().to_vec()
    }
}
