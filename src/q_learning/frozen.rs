//! Read-only greedy agent over a loaded value table.
//!
//! This is the narrow surface a board front-end needs: hand it the current
//! board and get back a legal move. It never updates its table.

use rand::{SeedableRng, rngs::StdRng};

use super::{
    agent::{build_rng, greedy_choice},
    value_table::ValueTable,
};
use crate::{ports::Policy, tictactoe::BoardState, types::StateKey};

/// Greedy policy over a frozen table
#[derive(Debug, Clone)]
pub struct FrozenAgent {
    table: ValueTable,
    rng: StdRng,
}

impl FrozenAgent {
    pub fn new(table: ValueTable) -> Self {
        Self {
            table,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Best legal move on `board`, ties broken uniformly.
    ///
    /// Returns `None` when the board has no legal moves.
    pub fn choose_move(&mut self, board: &BoardState) -> Option<usize> {
        greedy_choice(&self.table, &mut self.rng, &board.key(), &board.legal_moves())
    }

    /// All moves sharing the best value on `board`
    pub fn best_moves(&self, board: &BoardState) -> Vec<usize> {
        self.table.best_actions(&board.key(), &board.legal_moves())
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }
}

impl Policy for FrozenAgent {
    fn choose_action(&mut self, state: &StateKey, legal_actions: &[usize]) -> Option<usize> {
        greedy_choice(&self.table, &mut self.rng, state, legal_actions)
    }

    fn name(&self) -> &str {
        "Q-Learning (frozen)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_move_prefers_highest_value() {
        let board = BoardState::from_key("X........").unwrap();
        let mut table = ValueTable::new();
        table.set(board.key(), 4, 0.9);
        table.set(board.key(), 8, 0.1);

        let mut agent = FrozenAgent::new(table).with_seed(3);
        assert_eq!(agent.choose_move(&board), Some(4));
        assert_eq!(agent.best_moves(&board), vec![4]);
    }

    #[test]
    fn test_choose_move_only_returns_legal_moves() {
        let board = BoardState::from_key("XOXOX....").unwrap();
        let mut agent = FrozenAgent::new(ValueTable::new()).with_seed(1);
        for _ in 0..50 {
            let mv = agent.choose_move(&board).unwrap();
            assert!(board.legal_moves().contains(&mv));
        }
    }

    #[test]
    fn test_no_move_on_finished_board() {
        let board = BoardState::from_key("XXXOO....").unwrap();
        let mut agent = FrozenAgent::new(ValueTable::new());
        assert_eq!(agent.choose_move(&board), None);
    }
}
