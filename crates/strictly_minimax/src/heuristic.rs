//! Single-ply heuristic opponent.
//!
//! Much cheaper than exhaustive search and deliberately weaker: it sees
//! immediate wins and immediate threats, then falls back to positional
//! preference. Used for high-volume simulated play.

use crate::rules::completes_line;
use crate::types::{Board, CENTER, CORNERS, Player};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{instrument, trace};

/// Which rule of the heuristic produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum HeuristicRule {
    /// Completes a line for the mover.
    WinNow,
    /// Occupies the square that would complete the opponent's line.
    BlockNow,
    /// Takes the center.
    Center,
    /// Random empty corner.
    Corner,
    /// Random empty square.
    Any,
}

/// Chooses a move for `self_mark`, or `None` when the board is full.
///
/// Rules in order: win now, block now, center, random corner, random square.
/// Win and block ties go to the lowest index; `rng` is only consulted by
/// the two random rules.
#[instrument(skip(board, rng), fields(board = %board.to_compact()))]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    self_mark: Player,
    other_mark: Player,
    rng: &mut R,
) -> Option<usize> {
    choose_move_with_rule(board, self_mark, other_mark, rng).map(|(pos, _)| pos)
}

/// Like [`choose_move`], also reporting which rule fired.
pub fn choose_move_with_rule<R: Rng + ?Sized>(
    board: &Board,
    self_mark: Player,
    other_mark: Player,
    rng: &mut R,
) -> Option<(usize, HeuristicRule)> {
    let empties = board.legal_moves();
    if empties.is_empty() {
        return None;
    }

    let choice = if let Some(pos) = first_completing(board, &empties, self_mark) {
        (pos, HeuristicRule::WinNow)
    } else if let Some(pos) = first_completing(board, &empties, other_mark) {
        (pos, HeuristicRule::BlockNow)
    } else if board.is_empty(CENTER) {
        (CENTER, HeuristicRule::Center)
    } else {
        let corners: Vec<usize> = CORNERS
            .iter()
            .copied()
            .filter(|&pos| board.is_empty(pos))
            .collect();
        match corners.choose(rng) {
            Some(&pos) => (pos, HeuristicRule::Corner),
            None => {
                let &pos = empties.choose(rng)?;
                (pos, HeuristicRule::Any)
            }
        }
    };

    trace!(position = choice.0, rule = %choice.1, "Heuristic chose move");
    Some(choice)
}

fn first_completing(board: &Board, empties: &[usize], player: Player) -> Option<usize> {
    empties
        .iter()
        .copied()
        .find(|&pos| completes_line(board, pos, player))
}
