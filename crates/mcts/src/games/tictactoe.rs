//! Tic-tac-toe rules adapter.
//!
//! Tic-tac-toe is a solved game where perfect play always draws, which
//! makes it the standard correctness probe for the engine: search should
//! never lose to any opponent, should always punish mistakes, and two
//! searchers should always draw each other.

use std::fmt;

use uct_core::{GameRules, PlayerId, Result, UctError};

/// A mark on the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the opposing mark.
    pub fn opposite(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// The player identity holding this mark. X always moves first and is
    /// `PlayerId::One`.
    pub fn player(self) -> PlayerId {
        match self {
            Mark::X => PlayerId::One,
            Mark::O => PlayerId::Two,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// A move: the board cell to claim, indexed 0-8 row-major.
///
/// ```text
/// 0 | 1 | 2
/// ---------
/// 3 | 4 | 5
/// ---------
/// 6 | 7 | 8
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell(pub u8);

impl Cell {
    /// Get the row (0-2).
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    pub fn col(self) -> u8 {
        self.0 % 3
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

/// Board state.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct TicTacToeState {
    board: [Option<Mark>; 9],
    to_move: Mark,
    winner: Option<Mark>,
}

impl TicTacToeState {
    /// An empty board with X to move.
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            to_move: Mark::X,
            winner: None,
        }
    }

    /// The mark to move.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// The winning mark, if any.
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// The mark at a cell, if any.
    pub fn get(&self, cell: usize) -> Option<Mark> {
        self.board.get(cell).copied().flatten()
    }

    fn check_winner(&self) -> Option<Mark> {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2], // top row
            [3, 4, 5], // middle row
            [6, 7, 8], // bottom row
            [0, 3, 6], // left column
            [1, 4, 7], // center column
            [2, 5, 8], // right column
            [0, 4, 8], // main diagonal
            [2, 4, 6], // anti-diagonal
        ];

        for line in LINES {
            if let Some(mark) = self.board[line[0]] {
                if self.board[line[1]] == Some(mark) && self.board[line[2]] == Some(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    fn is_full(&self) -> bool {
        self.board.iter().all(|c| c.is_some())
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            for col in 0..3 {
                if col > 0 {
                    write!(f, " | ")?;
                }
                match self.board[row * 3 + col] {
                    Some(mark) => write!(f, " {} ", mark)?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Tic-tac-toe rules.
#[derive(Clone, Debug)]
pub struct TicTacToe;

impl GameRules for TicTacToe {
    type State = TicTacToeState;
    type Move = Cell;

    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move> {
        if state.winner.is_some() {
            return Vec::new();
        }
        state
            .board
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| Cell(i as u8))
            .collect()
    }

    fn next_state(&self, state: &Self::State, mv: Self::Move) -> Result<Self::State> {
        let idx = mv.0 as usize;
        if self.is_terminal(state) || idx >= 9 || state.board[idx].is_some() {
            return Err(UctError::IllegalMove);
        }
        let mut next = state.clone();
        next.board[idx] = Some(state.to_move);
        next.to_move = state.to_move.opposite();
        next.winner = next.check_winner();
        Ok(next)
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.winner.is_some() || state.is_full()
    }

    fn current_player(&self, state: &Self::State) -> PlayerId {
        state.to_move.player()
    }

    fn payoff(&self, state: &Self::State, player: PlayerId) -> Result<f64> {
        if !self.is_terminal(state) {
            return Err(UctError::NotTerminal);
        }
        Ok(match state.winner {
            Some(winner) if winner.player() == player => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        })
    }
}
