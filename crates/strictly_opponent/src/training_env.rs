//! Single-board training environment with a scripted opponent.
//!
//! The learning agent always plays X and the opponent O. Each `step` applies
//! the agent's move and, if the game continues, the opponent's reply, so a
//! trainer only ever sees positions where the agent is to move.

use derive_setters::Setters;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use strictly_minimax::{
    BOARD_SIZE, Board, MoveError, MoveStrategy, Outcome, Player, Square, StrategyKind, classify,
};
use tracing::{debug, instrument, trace, warn};

/// Board encoding handed to the agent: 0 empty, 1 agent, 2 opponent.
pub type Observation = [u8; BOARD_SIZE];

/// Mark played by the learning agent.
pub const AGENT_MARK: Player = Player::X;
/// Mark played by the scripted opponent.
pub const OPPONENT_MARK: Player = Player::O;

/// Reward for winning an episode.
pub const WIN_REWARD: f64 = 1.0;
/// Reward for losing an episode.
pub const LOSS_REWARD: f64 = -1.0;

/// Reward shaping and opponent settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct EnvConfig {
    /// Reward for choosing an occupied square; ends the episode.
    pub invalid_penalty: f64,
    /// Reward for a drawn episode.
    pub draw_reward: f64,
    /// Reward for every non-terminal step.
    pub step_penalty: f64,
    /// Probability that the opponent moves first after a reset.
    pub opponent_first_prob: f64,
    /// Policy the opponent plays.
    pub opponent: StrategyKind,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            invalid_penalty: -1.0,
            draw_reward: 0.0,
            step_penalty: -0.01,
            opponent_first_prob: 0.5,
            opponent: StrategyKind::Heuristic,
        }
    }
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepInfo {
    /// The game goes on.
    Continue,
    /// The agent chose an occupied square.
    InvalidAction,
    /// The agent completed a line.
    Win,
    /// The opponent completed a line.
    Loss,
    /// The board filled up with no line.
    Draw,
}

/// Result of one environment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Board after the agent's move and the opponent's reply.
    pub observation: Observation,
    /// Reward for this step.
    pub reward: f64,
    /// True when the episode is over.
    pub terminated: bool,
    /// Always false; episodes end only by termination.
    pub truncated: bool,
    /// Why the step ended the way it did.
    pub info: StepInfo,
}

/// Extra information from a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetInfo {
    /// True if the opponent has already made the first move.
    pub opponent_started: bool,
}

/// Tic-tac-toe environment for episode generation.
pub struct TicTacToeEnv {
    config: EnvConfig,
    opponent: Box<dyn MoveStrategy>,
    board: Board,
    rng: ChaCha8Rng,
    done: bool,
}

impl std::fmt::Debug for TicTacToeEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicTacToeEnv")
            .field("config", &self.config)
            .field("opponent", &self.opponent.name())
            .field("board", &self.board.to_compact())
            .field("done", &self.done)
            .finish()
    }
}

impl TicTacToeEnv {
    /// Creates an environment whose opponent is built from `config.opponent`.
    pub fn new(config: EnvConfig, seed: u64) -> Self {
        Self::with_opponent(config, config.opponent.build(), seed)
    }

    /// Creates an environment with a caller-supplied opponent strategy.
    #[instrument(skip(opponent), fields(opponent = opponent.name()))]
    pub fn with_opponent(config: EnvConfig, opponent: Box<dyn MoveStrategy>, seed: u64) -> Self {
        debug!("Creating training environment");
        Self {
            config,
            opponent,
            board: Board::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            done: false,
        }
    }

    /// Environment settings.
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// True once the current episode has ended.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Current board in agent encoding.
    pub fn observation(&self) -> Observation {
        let mut obs = [0u8; BOARD_SIZE];
        for (cell, square) in obs.iter_mut().zip(self.board.squares()) {
            *cell = match square {
                Square::Empty => 0,
                Square::Occupied(p) if *p == AGENT_MARK => 1,
                Square::Occupied(_) => 2,
            };
        }
        obs
    }

    /// Starts a new episode, reseeding first when `seed` is given.
    #[instrument(skip(self))]
    pub fn reset(&mut self, seed: Option<u64>) -> (Observation, ResetInfo) {
        if let Some(seed) = seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.board = Board::new();
        self.done = false;

        let mut info = ResetInfo::default();
        if self.rng.gen_range(0.0..1.0) < self.config.opponent_first_prob {
            let board = self.board;
            match self.opponent_move(board).map(|pos| board.place(pos, OPPONENT_MARK)) {
                Some(Ok(next)) => {
                    self.board = next;
                    info.opponent_started = true;
                }
                Some(Err(e)) => warn!(error = %e, "Opponent opening rejected"),
                None => {}
            }
        }

        debug!(opponent_started = info.opponent_started, "Episode reset");
        (self.observation(), info)
    }

    /// Plays `action` for the agent, then the opponent's reply.
    ///
    /// Choosing an occupied square is a legal (penalized) outcome; an index
    /// off the board or stepping a finished episode is a caller error.
    /// An illegal opponent reply is returned as an error and leaves the
    /// board as it was before the call.
    #[instrument(skip(self), fields(board = %self.board.to_compact()))]
    pub fn step(&mut self, action: usize) -> Result<Step, MoveError> {
        if self.done {
            return Err(MoveError::GameOver);
        }
        if action >= BOARD_SIZE {
            return Err(MoveError::OutOfBounds(action));
        }
        if !self.board.is_empty(action) {
            debug!("Agent chose an occupied square");
            return Ok(self.finish(self.config.invalid_penalty, StepInfo::InvalidAction));
        }

        let after_agent = self.board.place(action, AGENT_MARK)?;
        match classify(&after_agent) {
            Outcome::Win(_) => {
                self.board = after_agent;
                return Ok(self.finish(WIN_REWARD, StepInfo::Win));
            }
            Outcome::Draw => {
                self.board = after_agent;
                return Ok(self.finish(self.config.draw_reward, StepInfo::Draw));
            }
            Outcome::Ongoing => {}
        }

        let after_reply = match self.opponent_move(after_agent) {
            Some(pos) => after_agent.place(pos, OPPONENT_MARK).inspect_err(|e| {
                warn!(error = %e, position = pos, "Opponent reply rejected");
            })?,
            None => after_agent,
        };
        self.board = after_reply;
        match classify(&self.board) {
            Outcome::Win(_) => Ok(self.finish(LOSS_REWARD, StepInfo::Loss)),
            Outcome::Draw => Ok(self.finish(self.config.draw_reward, StepInfo::Draw)),
            Outcome::Ongoing => Ok(Step {
                observation: self.observation(),
                reward: self.config.step_penalty,
                terminated: false,
                truncated: false,
                info: StepInfo::Continue,
            }),
        }
    }

    fn opponent_move(&mut self, board: Board) -> Option<usize> {
        let pos = self.opponent.select(&board, OPPONENT_MARK, &mut self.rng);
        trace!(position = ?pos, opponent = self.opponent.name(), "Opponent reply");
        pos
    }

    fn finish(&mut self, reward: f64, info: StepInfo) -> Step {
        self.done = true;
        debug!(reward, %info, "Episode finished");
        Step {
            observation: self.observation(),
            reward,
            terminated: true,
            truncated: false,
            info,
        }
    }
}
