//! Strictly Minimax - tic-tac-toe move-decision engine
//!
//! Pure, synchronous game logic shared by every opponent in the workspace.
//!
//! # Architecture
//!
//! - **Board model**: [`Board`], [`classify`], [`legal_moves`], [`Board::place`]
//! - **Search**: exhaustive minimax with lowest-index tie-breaking ([`search`])
//! - **Heuristic**: win / block / center / corner lookahead ([`choose_move`])
//! - **Strategies**: both policies behind [`MoveStrategy`]
//!
//! Every function is a pure function of the board it receives; nothing is
//! cached between calls, so callers may share boards across threads freely.
//!
//! # Example
//!
//! ```
//! use strictly_minimax::{Board, Outcome, Player, classify, search};
//!
//! let board: Board = "XX..O....".parse().unwrap();
//! assert_eq!(classify(&board), Outcome::Ongoing);
//! assert_eq!(search(&board, Player::O).best_move, Some(2));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod heuristic;
mod rules;
mod search;
mod strategy;
mod types;

pub use error::{BoardParseError, MoveError};
pub use heuristic::{HeuristicRule, choose_move, choose_move_with_rule};
pub use rules::{LINES, Outcome, check_winner, classify, completes_line, is_full, legal_moves};
pub use search::{DRAW_VALUE, LOSS_VALUE, SearchResult, WIN_VALUE, search, terminal_value};
pub use strategy::{ExhaustiveSearch, HeuristicLookahead, MoveStrategy, StrategyKind};
pub use types::{BOARD_SIZE, Board, CENTER, CORNERS, Player, Square};
