//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines;
use crate::types::{BOARD_SIZE, StateKey};

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }

    pub(crate) fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Cells plus the player to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
            to_move: Player::X,
        }
    }

    /// Parse a board from its nine-character key.
    ///
    /// Whitespace other than the space character is ignored; `' '` and `'.'`
    /// both denote an empty cell. The player to move is inferred from piece
    /// counts with X moving first.
    ///
    /// # Errors
    ///
    /// Returns error if the board does not have exactly nine cells or any
    /// character is not a valid cell.
    pub fn from_key(key: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = key.chars().filter(|c| *c == ' ' || !c.is_whitespace()).collect();
        if chars.len() != BOARD_SIZE {
            return Err(crate::Error::InvalidBoardLength {
                expected: BOARD_SIZE,
                got: chars.len(),
                context: key.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: key.to_string(),
            })?;
        }

        let x = cells.iter().filter(|&&c| c == Cell::X).count();
        let o = cells.iter().filter(|&&c| c == Cell::O).count();
        let to_move = if x > o { Player::O } else { Player::X };

        Ok(BoardState { cells, to_move })
    }

    /// Canonical table key: nine characters in row-major order
    pub fn key(&self) -> StateKey {
        StateKey::new(self.cells.iter().map(|&c| c.to_char()).collect::<String>())
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Legal moves: empty cells while the game is not over
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Place the mover's mark and hand the turn over.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] for out-of-range or occupied
    /// cells and [`crate::Error::GameOver`] on a finished board.
    #[must_use = "make_move returns a new board state; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<BoardState, crate::Error> {
        if self.is_terminal() {
            return Err(crate::Error::GameOver);
        }
        if pos >= BOARD_SIZE {
            return Err(crate::Error::InvalidAction {
                action: pos,
                reason: "index out of range (must be 0-8)".to_string(),
            });
        }
        if !self.is_empty(pos) {
            return Err(crate::Error::InvalidAction {
                action: pos,
                reason: "cell already occupied".to_string(),
            });
        }

        let mut next = *self;
        next.cells[pos] = self.to_move.to_cell();
        next.to_move = self.to_move.opponent();
        Ok(next)
    }

    /// Winner and the completed triple, if any
    pub fn winning_line(&self) -> Option<(Player, [usize; 3])> {
        lines::has_winner(&self.cells)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        self.winning_line().map(|(player, _)| player)
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winning_line().is_some() || lines::is_full(&self.cells)
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        lines::is_full(&self.cells) && self.winning_line().is_none()
    }

    /// Text rendering with empty cells showing their index
    pub fn render(&self) -> String {
        let cell = |i: usize| match self.cells[i] {
            Cell::Empty => char::from_digit(i as u32, 10).unwrap_or('?'),
            c => c.to_char(),
        };
        let rows: Vec<String> = (0..3)
            .map(|r| format!("{} | {} | {}", cell(r * 3), cell(r * 3 + 1), cell(r * 3 + 2)))
            .collect();
        rows.join("\n--+---+--\n")
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
