//! Strictly Opponent - a tic-tac-toe opponent that never loses
//!
//! Combines untrusted move suggestions from a language model with the
//! exhaustive search from [`strictly_minimax`], and provides a training
//! environment with a scripted opponent for episode generation.
//!
//! # Architecture
//!
//! - **LLM client**: one chat-completion request per move, never fatal
//! - **Extraction**: ordered chain from `MOVE: <n>` down to any standalone digit
//! - **Resolver**: validated remote move, else minimax
//! - **Training environment**: reset/step loop with reward shaping
//!
//! # Example
//!
//! ```no_run
//! use strictly_opponent::{LlmClient, LlmConfig, MoveResolver};
//! use strictly_minimax::{Board, Player};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let resolver = MoveResolver::new(LlmClient::new(LlmConfig::from_env()), Player::O);
//! let board: Board = "XX..O....".parse()?;
//! let resolution = resolver.resolve_move(&board).await?;
//! println!("{} via {}", resolution.position, resolution.source);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod extract;
mod llm_client;
mod prompt;
mod resolver;
mod simulation;
mod training_env;

// Crate-level exports - Configuration
pub use config::{
    API_KEY_VAR, ConfigError, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
    ENDPOINT_VAR, LlmConfig, LlmSettings, MODEL_VAR, OpponentConfig, TIMEOUT_VAR, parse_timeout,
};

// Crate-level exports - LLM client
pub use extract::{EXTRACTORS, FinalAnswerMarker, MoveExtractor, StandaloneDigit, extract_move};
pub use llm_client::{LlmClient, LlmError, Suggestion};
pub use prompt::{MOVE_MARKER, build_prompt, describe_board, system_prompt};

// Crate-level exports - Resolution
pub use resolver::{MoveResolver, MoveSource, Resolution, resolve_move};

// Crate-level exports - Training
pub use simulation::{SimulationSummary, simulate};
pub use training_env::{
    AGENT_MARK, EnvConfig, LOSS_REWARD, OPPONENT_MARK, Observation, ResetInfo, Step, StepInfo,
    TicTacToeEnv, WIN_REWARD,
};
