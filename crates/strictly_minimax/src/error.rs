//! Error types for caller-contract violations.

use derive_more::Display;

/// A move that the engine refuses to apply or decide.
///
/// These are caller bugs, not recoverable engine states: the engine signals
/// them instead of silently corrupting a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MoveError {
    /// The index is not on the board (must be 0-8).
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// The square at the index already holds a mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(usize),

    /// The board is already won or drawn.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

/// Failure to read a board from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BoardParseError {
    /// The text does not describe exactly nine squares.
    #[display("Expected 9 squares, found {}", _0)]
    WrongLength(usize),

    /// A character that is neither a mark nor an empty marker.
    #[display("Unrecognized square '{}' at position {}", symbol, position)]
    InvalidSymbol {
        /// The offending character.
        symbol: char,
        /// Square index the character would have filled.
        position: usize,
    },
}

impl std::error::Error for BoardParseError {}
