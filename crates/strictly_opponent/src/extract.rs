//! Move extraction from free-form model output.
//!
//! Model text is untrusted. Extractors run in order from the most to the
//! least structured, each returning a move only if its square is empty on
//! the current board. The first hit wins; if none hits, there is no move.

use crate::prompt::MOVE_MARKER;
use strictly_minimax::Board;
use tracing::{debug, instrument};

/// One way of reading a move out of response text.
pub trait MoveExtractor: Sync {
    /// Name for logs.
    fn name(&self) -> &'static str;

    /// Returns an empty square referenced by `text`, if any.
    fn extract(&self, text: &str, board: &Board) -> Option<usize>;
}

/// The explicit final answer, `MOVE: <digit>` in any case.
///
/// Only the first `MOVE: <0-8>` match is considered; a `MOVE` without a
/// colon or followed by another digit is skipped. If the match names an
/// occupied square the extractor gives up rather than hunting for another.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalAnswerMarker;

impl MoveExtractor for FinalAnswerMarker {
    fn name(&self) -> &'static str {
        "final_answer_marker"
    }

    fn extract(&self, text: &str, board: &Board) -> Option<usize> {
        find_marker(text).filter(|&pos| board.is_empty(pos))
    }
}

/// Any digit 0-8 standing alone as a word, first empty one in reading order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandaloneDigit;

impl MoveExtractor for StandaloneDigit {
    fn name(&self) -> &'static str {
        "standalone_digit"
    }

    fn extract(&self, text: &str, board: &Board) -> Option<usize> {
        standalone_digits(text)
            .into_iter()
            .find(|&pos| board.is_empty(pos))
    }
}

/// Extractors in the order they are tried.
pub const EXTRACTORS: &[&dyn MoveExtractor] = &[&FinalAnswerMarker, &StandaloneDigit];

/// Runs the extractor chain over `text`.
#[instrument(skip(text, board), fields(text_length = text.len()))]
pub fn extract_move(text: &str, board: &Board) -> Option<usize> {
    EXTRACTORS.iter().find_map(|extractor| {
        let found = extractor.extract(text, board);
        if let Some(pos) = found {
            debug!(extractor = extractor.name(), position = pos, "Extracted move");
        }
        found
    })
}

fn board_digit(c: char) -> Option<usize> {
    match c {
        '0'..='8' => c.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Digit following the first `MOVE <ws> : <ws>` in `text`, if it is 0-8.
fn find_marker(text: &str) -> Option<usize> {
    for (start, _) in text.char_indices() {
        let Some(candidate) = text.get(start..start + MOVE_MARKER.len()) else {
            continue;
        };
        if !candidate.eq_ignore_ascii_case(MOVE_MARKER) {
            continue;
        }
        let rest = text[start + MOVE_MARKER.len()..].trim_start();
        let Some(rest) = rest.strip_prefix(':') else {
            continue;
        };
        if let Some(pos) = rest.trim_start().chars().next().and_then(board_digit) {
            return Some(pos);
        }
    }
    None
}

/// Every digit 0-8 with no letter, digit or underscore on either side.
fn standalone_digits(text: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| {
            let pos = board_digit(c)?;
            let open_before = i == 0 || !is_word_char(chars[i - 1]);
            let open_after = chars.get(i + 1).is_none_or(|&next| !is_word_char(next));
            (open_before && open_after).then_some(pos)
        })
        .collect()
}
