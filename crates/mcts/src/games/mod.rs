//! Game implementations bundled for validation and demos.

mod tictactoe;

pub use tictactoe::{Cell, Mark, TicTacToe, TicTacToeState};
