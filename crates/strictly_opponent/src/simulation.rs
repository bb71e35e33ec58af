//! Batch episode generation against the training environment.

use crate::training_env::{AGENT_MARK, EnvConfig, StepInfo, TicTacToeEnv};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use strictly_minimax::{MoveError, MoveStrategy};
use tracing::{info, instrument};

/// Offset separating the agent's random stream from the environment's.
const AGENT_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Totals over a batch of episodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Episodes played.
    pub episodes: usize,
    /// Episodes the agent won.
    pub wins: usize,
    /// Episodes the opponent won.
    pub losses: usize,
    /// Drawn episodes.
    pub draws: usize,
    /// Episodes ended by an occupied-square action.
    pub invalid: usize,
    /// Sum of all step rewards.
    pub total_reward: f64,
}

impl SimulationSummary {
    /// Average undiscounted return per episode.
    pub fn mean_return(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / self.episodes as f64
        }
    }

    fn record(&mut self, info: StepInfo) {
        match info {
            StepInfo::Win => self.wins += 1,
            StepInfo::Loss => self.losses += 1,
            StepInfo::Draw => self.draws += 1,
            StepInfo::InvalidAction => self.invalid += 1,
            StepInfo::Continue => {}
        }
    }
}

/// Plays `episodes` games of `agent` against the environment's opponent.
///
/// The same `seed`, config and strategies always give the same summary.
#[instrument(skip(agent), fields(agent = agent.name()))]
pub fn simulate(
    config: EnvConfig,
    agent: &dyn MoveStrategy,
    episodes: usize,
    seed: u64,
) -> Result<SimulationSummary, MoveError> {
    let mut env = TicTacToeEnv::new(config, seed);
    let mut agent_rng = ChaCha8Rng::seed_from_u64(seed ^ AGENT_STREAM);
    let mut summary = SimulationSummary::default();

    for episode in 0..episodes {
        let seed_for_reset = (episode == 0).then_some(seed);
        env.reset(seed_for_reset);

        loop {
            let action = agent
                .select(env.board(), AGENT_MARK, &mut agent_rng)
                .ok_or(MoveError::GameOver)?;
            let step = env.step(action)?;
            summary.total_reward += step.reward;
            if step.terminated {
                summary.record(step.info);
                break;
            }
        }
        summary.episodes += 1;
    }

    info!(
        episodes = summary.episodes,
        wins = summary.wins,
        losses = summary.losses,
        draws = summary.draws,
        mean_return = summary.mean_return(),
        "Simulation complete"
    );
    Ok(summary)
}
