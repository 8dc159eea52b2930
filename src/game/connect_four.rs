use serde::{Deserialize, Serialize};

use super::types::{GameError, MoveOutcome, PlayerId, Seat, SessionId};

pub const ROWS: usize = 6;
pub const COLUMNS: usize = 7;
const WINNING_RUN: usize = 4;

/// Horizontal, vertical, diagonal down-right, diagonal down-left, in the order they are checked.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    A,
    B,
}

impl From<Seat> for Cell {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::A => Cell::A,
            Seat::B => Cell::B,
        }
    }
}

/// Row 0 is the top of the grid; tokens settle towards row 5.
pub type Board = [[Cell; COLUMNS]; ROWS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    Player(Seat),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectFourSession {
    session_id: SessionId,
    players: [PlayerId; 2],
    board: Board,
    player_status: [bool; 2],
    status: bool,
    turn: Turn,
    move_counter: u32,
    player_moves: [u32; 2],
}

impl ConnectFourSession {
    #[tracing::instrument]
    pub fn new(player_a: PlayerId, player_b: PlayerId) -> Self {
        Self {
            session_id: SessionId::new(),
            players: [player_a, player_b],
            board: [[Cell::Empty; COLUMNS]; ROWS],
            player_status: [false; 2],
            status: false,
            turn: Turn::Player(Seat::A),
            move_counter: 0,
            player_moves: [0; 2],
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

    pub fn get_status(&self) -> bool {
        self.status
    }

    pub fn get_turn(&self) -> Turn {
        self.turn
    }

    pub fn get_move_counter(&self) -> u32 {
        self.move_counter
    }

    pub fn has_won(&self, seat: Seat) -> bool {
        self.player_status[seat.index()]
    }

    pub fn get_player_moves(&self, seat: Seat) -> u32 {
        self.player_moves[seat.index()]
    }

    pub fn get_current_player(&self) -> Option<&PlayerId> {
        match self.turn {
            Turn::Player(seat) => Some(&self.players[seat.index()]),
            Turn::Draw => None,
        }
    }

    pub fn seat_of(&self, player: &PlayerId) -> Option<Seat> {
        [Seat::A, Seat::B]
            .into_iter()
            .find(|seat| &self.players[seat.index()] == player)
    }

    //  --- Public mutators ---

    /// Drops `player`'s token into `column` (1-based).
    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn apply_move(&mut self, column: u8, player: &PlayerId) -> MoveOutcome {
        let Some(seat) = self.seat_of(player) else {
            tracing::warn!(player = %player, "Move from a player outside the session.");
            return MoveOutcome::Rejected {
                reason: GameError::NotAPlayer(player.clone()),
            };
        };
        if column == 0 || usize::from(column) > COLUMNS {
            return MoveOutcome::Rejected {
                reason: GameError::NoSuchColumn(column),
            };
        }
        let col = usize::from(column) - 1;

        let has_winner = self.player_status.iter().any(|won| *won);
        let row = match self.next_open_row(col) {
            Some(row) if !has_winner => row,
            _ => return self.acknowledge_terminal(seat, column, has_winner),
        };

        self.board[row][col] = seat.into();
        self.move_counter += 1;
        self.player_moves[seat.index()] += 1;

        if self.is_winning_move(row, col) {
            self.status = true;
            self.player_status[seat.index()] = true;
            self.turn = Turn::Player(seat);
            tracing::info!(winner = %player, moves = self.move_counter, "Four in a row.");
            return MoveOutcome::Won {
                winner: Some(player.clone()),
                moves: self.move_counter,
            };
        }

        if self.is_board_full() {
            self.status = true;
            self.turn = Turn::Draw;
            tracing::info!(moves = self.move_counter, "Board full, game drawn.");
            return MoveOutcome::Drawn {
                moves: self.move_counter,
            };
        }

        self.turn = Turn::Player(seat.other());
        MoveOutcome::Continue
    }

    //  --- Private helpers ---

    /// A move against a full column or a decided game leaves the board alone and
    /// hands the turn to the other party, unless the game already ended drawn.
    fn acknowledge_terminal(&mut self, seat: Seat, column: u8, has_winner: bool) -> MoveOutcome {
        if self.turn != Turn::Draw {
            self.turn = Turn::Player(seat.other());
        }
        self.status = self.status || has_winner;

        let reason = if has_winner {
            GameError::AlreadyOver
        } else {
            GameError::ColumnFull(column)
        };
        tracing::debug!(%reason, turn = ?self.turn, "Terminal acknowledgment.");
        MoveOutcome::Acknowledged { reason }
    }

    fn next_open_row(&self, col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| self.board[row][col] == Cell::Empty)
    }

    fn is_board_full(&self) -> bool {
        self.board.iter().flatten().all(|cell| *cell != Cell::Empty)
    }

    fn is_winning_move(&self, row: usize, col: usize) -> bool {
        let cell = self.board[row][col];
        DIRECTIONS.iter().any(|&(dr, dc)| {
            1 + self.run_length(row, col, dr, dc, cell) + self.run_length(row, col, -dr, -dc, cell)
                >= WINNING_RUN
        })
    }

    /// Counts matching cells walking away from `(row, col)`, not counting the start cell.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while (0..ROWS as isize).contains(&r)
            && (0..COLUMNS as isize).contains(&c)
            && self.board[r as usize][c as usize] == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}
