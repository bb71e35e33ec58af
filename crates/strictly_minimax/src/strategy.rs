//! Move-selection strategies over the shared board model.

use crate::heuristic::choose_move;
use crate::search::search;
use crate::types::{Board, Player};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A policy that picks a move for one side.
///
/// Randomness is supplied by the caller so that strategies hold no hidden
/// state and can be shared freely between threads.
pub trait MoveStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Picks a move for `mark`, or `None` when no legal move exists.
    fn select(&self, board: &Board, mark: Player, rng: &mut dyn RngCore) -> Option<usize>;
}

/// Perfect play via exhaustive minimax. Ignores `rng`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExhaustiveSearch;

impl MoveStrategy for ExhaustiveSearch {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    #[instrument(skip(self, board, _rng), fields(board = %board.to_compact()))]
    fn select(&self, board: &Board, mark: Player, _rng: &mut dyn RngCore) -> Option<usize> {
        search(board, mark).best_move
    }
}

/// One-ply lookahead with positional preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeuristicLookahead;

impl MoveStrategy for HeuristicLookahead {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn select(&self, board: &Board, mark: Player, rng: &mut dyn RngCore) -> Option<usize> {
        choose_move(board, mark, mark.opponent(), rng)
    }
}

/// Tagged choice of strategy, used by configuration and the CLI.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StrategyKind {
    /// [`ExhaustiveSearch`].
    Exhaustive,
    /// [`HeuristicLookahead`].
    #[default]
    Heuristic,
}

impl StrategyKind {
    /// Builds the strategy this tag names.
    pub fn build(self) -> Box<dyn MoveStrategy> {
        match self {
            StrategyKind::Exhaustive => Box::new(ExhaustiveSearch),
            StrategyKind::Heuristic => Box::new(HeuristicLookahead),
        }
    }
}
