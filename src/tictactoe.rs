//! Tic-Tac-Toe game implementation and training environment

pub mod board;
pub mod environment;
pub mod lines;

pub use board::{BoardState, Cell, Player};
pub use environment::TicTacToeEnv;
pub use lines::{WINNING_LINES, has_winner};
