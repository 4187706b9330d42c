//! Tic-Tac-Toe as a training environment
//!
//! X always opens. Rewards are reported from a fixed perspective that favours
//! O, the second mover: `+1.0` when O wins, `-1.0` when X wins, `0.0` for a
//! draw or any non-terminal step. The learning agent is therefore trained to
//! play O.

use super::board::{BoardState, Player};
use crate::{
    Result,
    ports::{Environment, Step},
    types::{BOARD_SIZE, StateKey},
};

/// Reward when O completes a line
pub const O_WIN_REWARD: f64 = 1.0;
/// Reward when X completes a line
pub const X_WIN_REWARD: f64 = -1.0;

/// Mutable Tic-Tac-Toe game with terminal bookkeeping
#[derive(Debug, Clone)]
pub struct TicTacToeEnv {
    board: BoardState,
    done: bool,
    winner: Option<(Player, [usize; 3])>,
}

impl TicTacToeEnv {
    /// Create an environment at the empty start position
    pub fn new() -> Self {
        Self {
            board: BoardState::new(),
            done: false,
            winner: None,
        }
    }

    /// Current board
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Winning mark, once the episode has been won
    pub fn winner(&self) -> Option<Player> {
        self.winner.map(|(player, _)| player)
    }

    /// Triple of indices that won the episode
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.winner.map(|(_, line)| line)
    }

    fn reward_for(winner: Option<Player>) -> f64 {
        match winner {
            Some(Player::O) => O_WIN_REWARD,
            Some(Player::X) => X_WIN_REWARD,
            None => 0.0,
        }
    }
}

impl Default for TicTacToeEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for TicTacToeEnv {
    type Mover = Player;

    fn reset(&mut self) -> StateKey {
        self.board = BoardState::new();
        self.done = false;
        self.winner = None;
        self.board.key()
    }

    fn state_key(&self) -> StateKey {
        self.board.key()
    }

    fn legal_actions(&self) -> Vec<usize> {
        if self.done {
            return Vec::new();
        }
        self.board.empty_positions()
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if self.done {
            return Err(crate::Error::InvalidAction {
                action,
                reason: "episode already ended".to_string(),
            });
        }

        let mover = self.board.to_move;
        let mut next = self.board.make_move(action)?;

        self.winner = next.winning_line();
        self.done = self.winner.is_some() || next.empty_positions().is_empty();

        // The mover keeps the turn on a terminal board.
        if self.done {
            next.to_move = mover;
        }
        self.board = next;

        let reward = if self.done {
            Self::reward_for(self.winner())
        } else {
            0.0
        };

        Ok(Step {
            state: self.board.key(),
            reward,
            done: self.done,
        })
    }

    fn current_mover(&self) -> Player {
        self.board.to_move
    }

    fn agent_side(&self) -> Player {
        Player::O
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn max_plies(&self) -> usize {
        BOARD_SIZE
    }

    fn render(&self) -> String {
        self.board.render()
    }

    fn name(&self) -> &str {
        "tictactoe"
    }
}
