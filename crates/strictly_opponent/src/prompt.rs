//! Prompt construction for move suggestions.

use strictly_minimax::{Board, Player};

/// The marker the model is asked to end its answer with.
pub const MOVE_MARKER: &str = "MOVE";

/// System prompt naming the side the model plays.
pub fn system_prompt(mark: Player) -> String {
    format!("You are an unbeatable tic tac toe player playing as {}.", mark)
}

/// Renders every square as `index:occupant`, `.` for empty.
///
/// `XX..O....` becomes `0:X 1:X 2:. 3:. 4:O 5:. 6:. 7:. 8:.`.
pub fn describe_board(board: &Board) -> String {
    board
        .squares()
        .iter()
        .enumerate()
        .map(|(pos, square)| format!("{}:{}", pos, square.symbol()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// User prompt asking for one move on `board` as `mark`.
pub fn build_prompt(board: &Board, mark: Player) -> String {
    format!(
        "We are playing tic tac toe. You are {mark}, I am {opponent}. \
         Squares are indexed 0-8 left-to-right, top-to-bottom. \
         Current board: {board}. \
         Pick the best EMPTY square and justify it in one or two sentences, \
         then end with a final line exactly as: {marker}: <index> using a digit 0-8.",
        mark = mark,
        opponent = mark.opponent(),
        board = describe_board(board),
        marker = MOVE_MARKER,
    )
}
