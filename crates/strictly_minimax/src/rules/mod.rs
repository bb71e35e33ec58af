//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating game state
//! according to tic-tac-toe rules. Rules are separated from board
//! storage so that search and heuristics share one definition of a win.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner, completes_line};

use crate::types::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Classification of a board.
///
/// Never stored alongside a board; always recomputed by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Empty squares remain and no line is complete.
    Ongoing,
    /// A player holds a complete line.
    Win(Player),
    /// Every square is filled and no line is complete.
    Draw,
}

impl Outcome {
    /// True for `Win` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Classifies a board as won, drawn or still open.
///
/// A completed line always takes precedence over a full board.
#[instrument(level = "trace")]
pub fn classify(board: &Board) -> Outcome {
    if let Some(winner) = check_winner(board) {
        Outcome::Win(winner)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

/// All empty positions in ascending order.
pub fn legal_moves(board: &Board) -> Vec<usize> {
    board.legal_moves()
}
