//! Win detection logic for tic-tac-toe.

use crate::types::{Board, Player, Square};
use tracing::instrument;

/// The eight winning lines in fixed order: rows, columns, diagonals.
#[rustfmt::skip]
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],            // Diagonals
];

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` for the first line in [`LINES`] order holding
/// three equal marks, `None` otherwise. Illegal boards with two winners
/// resolve deterministically to the earlier line.
#[instrument(level = "trace")]
pub fn check_winner(board: &Board) -> Option<Player> {
    let squares = board.squares();
    LINES.iter().find_map(|&[a, b, c]| match squares[a] {
        Square::Occupied(player) if squares[b] == squares[a] && squares[c] == squares[a] => {
            Some(player)
        }
        _ => None,
    })
}

/// True if `player` placing a mark at `pos` would complete a line.
///
/// Only the lines through `pos` are inspected; the square itself is
/// assumed empty.
pub fn completes_line(board: &Board, pos: usize, player: Player) -> bool {
    let mark = Square::Occupied(player);
    LINES
        .iter()
        .filter(|line| line.contains(&pos))
        .any(|line| {
            line.iter()
                .filter(|&&other| other != pos)
                .all(|&other| board.get(other) == Some(mark))
        })
}
