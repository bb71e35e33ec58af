//! Exhaustive minimax search.
//!
//! The full game tree from any tic-tac-toe position is small enough to
//! enumerate, so the search visits every line of play without pruning or
//! depth limits. Values are from the maximizing player's point of view:
//! `+1` win, `-1` loss, `0` draw.

use crate::rules::{Outcome, classify};
use crate::types::{BOARD_SIZE, Board, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Value of a position won by the maximizing player.
pub const WIN_VALUE: i32 = 1;
/// Value of a position won by the other player.
pub const LOSS_VALUE: i32 = -1;
/// Value of a drawn position.
pub const DRAW_VALUE: i32 = 0;

/// Game-theoretic value of a position and the move that achieves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    /// Value under perfect play, from the maximizing player's side.
    pub value: i32,
    /// Optimal move for the maximizing player; `None` on terminal boards.
    pub best_move: Option<usize>,
}

/// Searches `board` with `maximizing` to move.
///
/// Ties between equally valued moves go to the lowest index, so the same
/// board and side always yield the same result.
#[instrument(skip(board), fields(board = %board.to_compact()))]
pub fn search(board: &Board, maximizing: Player) -> SearchResult {
    let result = minimax(board, maximizing, maximizing);
    debug!(value = result.value, best_move = ?result.best_move, "Search complete");
    result
}

/// Value of a terminal outcome for `maximizing`, `None` while ongoing.
pub fn terminal_value(outcome: Outcome, maximizing: Player) -> Option<i32> {
    match outcome {
        Outcome::Ongoing => None,
        Outcome::Draw => Some(DRAW_VALUE),
        Outcome::Win(winner) if winner == maximizing => Some(WIN_VALUE),
        Outcome::Win(_) => Some(LOSS_VALUE),
    }
}

fn minimax(board: &Board, maximizing: Player, to_move: Player) -> SearchResult {
    if let Some(value) = terminal_value(classify(board), maximizing) {
        return SearchResult {
            value,
            best_move: None,
        };
    }

    let is_max_layer = to_move == maximizing;
    let mut best: Option<(i32, usize)> = None;

    for pos in (0..BOARD_SIZE).filter(|&pos| board.is_empty(pos)) {
        let child = board.with_mark(pos, to_move);
        let value = minimax(&child, maximizing, to_move.opponent()).value;

        // Strict comparison keeps the first move among equals.
        let improves = match best {
            None => true,
            Some((best_value, _)) if is_max_layer => value > best_value,
            Some((best_value, _)) => value < best_value,
        };
        if improves {
            best = Some((value, pos));
        }
    }

    match best {
        Some((value, pos)) => SearchResult {
            value,
            best_move: Some(pos),
        },
        // Unreachable for an ongoing board: it always has an empty square.
        None => SearchResult {
            value: DRAW_VALUE,
            best_move: None,
        },
    }
}
