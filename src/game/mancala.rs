use serde::{Deserialize, Serialize};

use super::types::{GameError, MoveOutcome, PlayerId, Seat, SessionId};

pub const ROWS: usize = 2;
pub const COLUMNS: usize = 7;
pub const DEFAULT_STONES_PER_HOLE: u32 = 4;

type Hole = (usize, usize);

/// Player A's store closes row 1, player B's store opens row 0.
const STORE_A: Hole = (1, 6);
const STORE_B: Hole = (0, 0);

/// Sowing order, counter-clockwise: row 0 right to left, then row 1 left to right.
const RING: [Hole; 14] = [
    (0, 6),
    (0, 5),
    (0, 4),
    (0, 3),
    (0, 2),
    (0, 1),
    (0, 0),
    (1, 0),
    (1, 1),
    (1, 2),
    (1, 3),
    (1, 4),
    (1, 5),
    (1, 6),
];

pub type Board = [[u32; COLUMNS]; ROWS];

fn store_of(seat: Seat) -> Hole {
    match seat {
        Seat::A => STORE_A,
        Seat::B => STORE_B,
    }
}

fn is_store(hole: Hole) -> bool {
    hole == STORE_A || hole == STORE_B
}

fn ring_index((row, col): Hole) -> usize {
    if row == 0 {
        6 - col
    } else {
        7 + col
    }
}

/// The hole across the board from a non-store hole. Row 0 is shifted one column
/// right of row 1, so `(0, c)` faces `(1, c - 1)`.
fn opposite((row, col): Hole) -> Hole {
    if row == 0 {
        (1, col - 1)
    } else {
        (0, col + 1)
    }
}

/// Holes belonging to each side, store excluded.
fn side(seat: Seat) -> impl Iterator<Item = Hole> {
    let (row, columns) = match seat {
        Seat::A => (1, 0..6),
        Seat::B => (0, 1..7),
    };
    columns.map(move |col| (row, col))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MancalaSession {
    session_id: SessionId,
    players: [PlayerId; 2],
    board: Board,
    scores: [u32; 2],
    status: bool,
    next_player: Option<Seat>,
    move_counter: u32,
}

impl MancalaSession {
    #[tracing::instrument]
    pub fn new(player_a: PlayerId, player_b: PlayerId, stones_per_hole: u32) -> Self {
        let mut board = [[stones_per_hole; COLUMNS]; ROWS];
        for (row, col) in [STORE_A, STORE_B] {
            board[row][col] = 0;
        }
        Self {
            session_id: SessionId::new(),
            players: [player_a, player_b],
            board,
            scores: [0; 2],
            status: false,
            next_player: Some(Seat::A),
            move_counter: 0,
        }
    }

    // Getters
    pub fn get_id(&self) -> SessionId {
        self.session_id
    }

    pub fn get_players(&self) -> &[PlayerId; 2] {
        &self.players
    }

    pub fn get_board(&self) -> &Board {
        &self.board
    }

    pub fn get_score(&self, seat: Seat) -> u32 {
        self.scores[seat.index()]
    }

    pub fn get_status(&self) -> bool {
        self.status
    }

    pub fn get_move_counter(&self) -> u32 {
        self.move_counter
    }

    pub fn get_next_player(&self) -> Option<&PlayerId> {
        self.next_player.map(|seat| &self.players[seat.index()])
    }

    pub fn total_stones(&self) -> u32 {
        self.board.iter().flatten().sum()
    }

    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        [Seat::A, Seat::B]
            .into_iter()
            .find(|seat| &self.players[seat.index()] == player)
    }

    //  --- Public mutators ---

    /// Sows every stone from `(row, column)` on behalf of `player`.
    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn apply_move(&mut self, row: u8, column: u8, player: &PlayerId) -> MoveOutcome {
        let seat = match self.check_move(row, column, player) {
            Ok(seat) => seat,
            Err(reason) => {
                tracing::debug!(%reason, "Mancala move rejected.");
                return MoveOutcome::Rejected { reason };
            }
        };
        let hole = (usize::from(row), usize::from(column));

        let stones = std::mem::take(&mut self.board[hole.0][hole.1]);
        self.move_counter += 1;
        let last = self.sow(hole, stones, seat);

        let plays_again = if last == store_of(seat) {
            true
        } else if !is_store(last) && self.board[last.0][last.1] == 1 {
            self.capture(last, seat);
            true
        } else {
            false
        };
        self.next_player = Some(if plays_again { seat } else { seat.other() });
        self.refresh_scores();

        if self.side_is_empty(Seat::A) || self.side_is_empty(Seat::B) {
            return self.finish();
        }
        MoveOutcome::Continue
    }

    //  --- Private helpers ---

    fn check_move(&self, row: u8, column: u8, player: &PlayerId) -> Result<Seat, GameError> {
        let seat = self
            .seat_of(player)
            .ok_or_else(|| GameError::NotAPlayer(player.clone()))?;
        if self.status {
            return Err(GameError::GameFinished);
        }
        let hole = (usize::from(row), usize::from(column));
        if hole.0 >= ROWS || hole.1 >= COLUMNS {
            return Err(GameError::NoSuchHole { row, column });
        }
        if is_store(hole) {
            return Err(GameError::StoreHole { row, column });
        }
        if self.board[hole.0][hole.1] == 0 {
            return Err(GameError::EmptyHole { row, column });
        }
        Ok(seat)
    }

    /// Drops stones one by one along the ring, skipping the opponent's store.
    /// Returns the hole that received the last stone.
    fn sow(&mut self, from: Hole, stones: u32, seat: Seat) -> Hole {
        let skipped = store_of(seat.other());
        let mut index = ring_index(from);
        let mut last = from;
        let mut remaining = stones;
        while remaining > 0 {
            index = (index + 1) % RING.len();
            let hole = RING[index];
            if hole == skipped {
                continue;
            }
            self.board[hole.0][hole.1] += 1;
            last = hole;
            remaining -= 1;
        }
        last
    }

    fn capture(&mut self, landed: Hole, seat: Seat) {
        let (row, col) = opposite(landed);
        let taken = std::mem::take(&mut self.board[row][col]);
        let (store_row, store_col) = store_of(seat);
        self.board[store_row][store_col] += taken;
        tracing::debug!(?landed, taken, "Capture.");
    }

    fn side_is_empty(&self, seat: Seat) -> bool {
        side(seat).all(|(row, col)| self.board[row][col] == 0)
    }

    fn refresh_scores(&mut self) {
        for seat in [Seat::A, Seat::B] {
            let (row, col) = store_of(seat);
            self.scores[seat.index()] = self.board[row][col];
        }
    }

    /// Sweeps each side's leftover stones into its own store and settles the winner.
    fn finish(&mut self) -> MoveOutcome {
        for seat in [Seat::A, Seat::B] {
            let swept: u32 = side(seat)
                .map(|(row, col)| std::mem::take(&mut self.board[row][col]))
                .sum();
            let (row, col) = store_of(seat);
            self.board[row][col] += swept;
        }
        self.refresh_scores();
        self.status = true;

        let [score_a, score_b] = self.scores;
        self.next_player = match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => Some(Seat::A),
            std::cmp::Ordering::Less => Some(Seat::B),
            std::cmp::Ordering::Equal => None,
        };
        tracing::info!(score_a, score_b, moves = self.move_counter, "Mancala game over.");

        match self.next_player {
            Some(winner) => MoveOutcome::Won {
                winner: Some(self.players[winner.index()].clone()),
                moves: self.move_counter,
            },
            None => MoveOutcome::Drawn {
                moves: self.move_counter,
            },
        }
    }
}
