//! Core domain types for tic-tac-toe.

use crate::error::{BoardParseError, MoveError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Number of squares on the board.
pub const BOARD_SIZE: usize = 9;

/// Index of the center square.
pub const CENTER: usize = 4;

/// Indices of the four corner squares.
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Player {
    /// Player X (goes first in a fresh game).
    X,
    /// Player O.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// The character used for this player's mark.
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// The character used for this square in prompts and board strings.
    pub fn symbol(self) -> char {
        match self {
            Square::Empty => '.',
            Square::Occupied(player) => player.symbol(),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// The board never tracks whose turn it is. Callers alternate turns and the
/// engine evaluates whatever state it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; BOARD_SIZE],
        }
    }

    /// Creates a board from squares in row-major order.
    pub fn from_squares(squares: [Square; BOARD_SIZE]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Checks if a square is empty. Out-of-range positions are never empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; BOARD_SIZE] {
        &self.squares
    }

    /// Number of squares holding a mark.
    pub fn occupied_count(&self) -> usize {
        self.squares
            .iter()
            .filter(|square| **square != Square::Empty)
            .count()
    }

    /// All empty positions in ascending order.
    ///
    /// The ordering is part of the contract: search and fallback tie-breaks
    /// depend on it.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..BOARD_SIZE).filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Returns a new board with `player`'s mark at `pos`.
    ///
    /// The receiver is left untouched. Placing on an occupied square or off
    /// the board is a caller bug and is reported rather than applied.
    #[instrument(level = "trace")]
    pub fn place(&self, pos: usize, player: Player) -> Result<Board, MoveError> {
        match self.get(pos) {
            None => Err(MoveError::OutOfBounds(pos)),
            Some(Square::Occupied(_)) => Err(MoveError::SquareOccupied(pos)),
            Some(Square::Empty) => Ok(self.with_mark(pos, player)),
        }
    }

    /// Places a mark without validation. `pos` must be an empty in-range square.
    pub(crate) fn with_mark(&self, pos: usize, player: Player) -> Board {
        let mut next = *self;
        next.squares[pos] = Square::Occupied(player);
        next
    }

    /// Compact nine-character form, e.g. `XX..O....`.
    pub fn to_compact(&self) -> String {
        self.squares.iter().map(|square| square.symbol()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.squares[pos] {
                    Square::Empty => write!(f, "{}", pos)?,
                    Square::Occupied(player) => write!(f, "{}", player.symbol())?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parses `X`/`O` marks (any case) and `.`, `-` or `_` for empty squares.
    /// Whitespace, `/`, `|` and `,` are treated as separators and skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut squares = Vec::with_capacity(BOARD_SIZE);
        for symbol in s.chars() {
            if symbol.is_whitespace() || matches!(symbol, '/' | '|' | ',') {
                continue;
            }
            let square = match symbol {
                'x' | 'X' => Square::Occupied(Player::X),
                'o' | 'O' => Square::Occupied(Player::O),
                '.' | '-' | '_' => Square::Empty,
                _ => {
                    return Err(BoardParseError::InvalidSymbol {
                        symbol,
                        position: squares.len(),
                    });
                }
            };
            squares.push(square);
        }

        let squares: [Square; BOARD_SIZE] = squares
            .try_into()
            .map_err(|rejected: Vec<Square>| BoardParseError::WrongLength(rejected.len()))?;
        Ok(Self::from_squares(squares))
    }
}
