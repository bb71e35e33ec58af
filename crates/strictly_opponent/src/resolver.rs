//! Move resolution: remote suggestion first, exhaustive search as fallback.

use crate::config::LlmConfig;
use crate::llm_client::LlmClient;
use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strictly_minimax::{Board, MoveError, Outcome, Player, classify, search};
use tracing::{info, instrument, warn};

/// Where a resolved move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MoveSource {
    /// A validated remote suggestion.
    Remote,
    /// The minimax fallback.
    Search,
}

/// A move chosen by the resolver, shown as `<position> (<source>)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, new)]
#[display("{} ({})", position, source)]
pub struct Resolution {
    /// Square to play.
    pub position: usize,
    /// Which path produced it.
    pub source: MoveSource,
}

/// Resolves moves for one side.
///
/// A remote suggestion is trusted whenever it names an empty square, even if
/// search would rate it lower. Everything else falls back to search, so with
/// remote suggestions disabled the resolver plays perfectly.
#[derive(Debug, Clone)]
pub struct MoveResolver {
    client: LlmClient,
    mark: Player,
}

impl MoveResolver {
    /// Creates a resolver playing `mark`.
    pub fn new(client: LlmClient, mark: Player) -> Self {
        Self { client, mark }
    }

    /// The side this resolver plays.
    pub fn mark(&self) -> Player {
        self.mark
    }

    /// Picks a move on `board`.
    ///
    /// Fails with [`MoveError::GameOver`] when the board is already won or
    /// drawn; no remote request is made in that case.
    #[instrument(skip(self, board), fields(board = %board.to_compact(), mark = %self.mark))]
    pub async fn resolve_move(&self, board: &Board) -> Result<Resolution, MoveError> {
        if classify(board) != Outcome::Ongoing {
            warn!("Refusing to resolve a move on a finished board");
            return Err(MoveError::GameOver);
        }

        let suggestion = self.client.suggest(board, self.mark).await;
        match suggestion.position() {
            Some(pos) if board.is_empty(pos) => {
                info!(position = pos, "Using remote suggestion");
                return Ok(Resolution::new(pos, MoveSource::Remote));
            }
            Some(pos) => warn!(position = pos, "Remote suggestion names an occupied square"),
            None => info!(
                reason = suggestion.note().unwrap_or("unknown"),
                "Using fallback minimax"
            ),
        }

        let pos = search(board, self.mark)
            .best_move
            .ok_or(MoveError::GameOver)?;
        info!(position = pos, "Using search move");
        Ok(Resolution::new(pos, MoveSource::Search))
    }
}

/// One-shot resolution for `mark` with a fresh client built from `config`.
#[instrument(skip(board, config), fields(board = %board.to_compact()))]
pub async fn resolve_move(
    board: &Board,
    mark: Player,
    config: &LlmConfig,
) -> Result<usize, MoveError> {
    let resolver = MoveResolver::new(LlmClient::new(config.clone()), mark);
    resolver
        .resolve_move(board)
        .await
        .map(|resolution| resolution.position)
}
