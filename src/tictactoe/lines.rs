//! Winning line detection for Tic-Tac-Toe

use super::{Cell, Player};

/// Winning line indices on the 3x3 board, in detection order
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Find the first completed line on the board.
///
/// Lines are checked rows first, then columns, then diagonals; the first
/// triple of three equal non-empty marks wins, so a board with several
/// completed lines reports the earliest one in that order.
pub fn has_winner(cells: &[Cell; 9]) -> Option<(Player, [usize; 3])> {
    WINNING_LINES.iter().find_map(|&line| {
        let [a, b, c] = line;
        match cells[a].to_player() {
            Some(player) if cells[a] == cells[b] && cells[b] == cells[c] => Some((player, line)),
            _ => None,
        }
    })
}

/// Check if a player has three in a row
pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
    let target = player.to_cell();
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&idx| cells[idx] == target))
}

/// Check whether every cell is occupied
pub fn is_full(cells: &[Cell; 9]) -> bool {
    !cells.contains(&Cell::Empty)
}
