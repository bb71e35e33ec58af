//! Training environment episodes with scripted and built-in opponents.

use rand::RngCore;
use std::sync::atomic::{AtomicUsize, Ordering};
use strictly_minimax::{Board, ExhaustiveSearch, MoveError, MoveStrategy, Player, StrategyKind};
use strictly_opponent::{
    EnvConfig, LOSS_REWARD, StepInfo, TicTacToeEnv, WIN_REWARD, simulate,
};

/// Opponent that replays a fixed list of squares.
struct Scripted {
    moves: Vec<usize>,
    next: AtomicUsize,
}

impl Scripted {
    fn boxed(moves: &[usize]) -> Box<dyn MoveStrategy> {
        Box::new(Self {
            moves: moves.to_vec(),
            next: AtomicUsize::new(0),
        })
    }
}

impl MoveStrategy for Scripted {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn select(&self, _board: &Board, _mark: Player, _rng: &mut dyn RngCore) -> Option<usize> {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.moves.get(i).copied()
    }
}

fn agent_first() -> EnvConfig {
    EnvConfig::default().with_opponent_first_prob(0.0)
}

fn scripted_env(moves: &[usize]) -> TicTacToeEnv {
    let mut env = TicTacToeEnv::with_opponent(agent_first(), Scripted::boxed(moves), 7);
    let (obs, info) = env.reset(None);
    assert_eq!(obs, [0; 9]);
    assert!(!info.opponent_started);
    env
}

#[test]
fn test_agent_win() {
    let mut env = scripted_env(&[3, 4]);

    for action in [0, 1] {
        let step = env.step(action).unwrap();
        assert_eq!(step.info, StepInfo::Continue);
        assert_eq!(step.reward, -0.01);
        assert!(!step.terminated);
        assert!(!step.truncated);
    }

    let step = env.step(2).unwrap();
    assert_eq!(step.info, StepInfo::Win);
    assert_eq!(step.reward, WIN_REWARD);
    assert!(step.terminated);
    assert_eq!(step.observation, [1, 1, 1, 2, 2, 0, 0, 0, 0]);
    assert!(env.is_done());
}

#[test]
fn test_agent_loss() {
    let mut env = scripted_env(&[3, 4, 5]);
    env.step(0).unwrap();
    env.step(1).unwrap();

    let step = env.step(8).unwrap();
    assert_eq!(step.info, StepInfo::Loss);
    assert_eq!(step.reward, LOSS_REWARD);
    assert!(step.terminated);
    assert_eq!(step.observation, [1, 1, 0, 2, 2, 2, 0, 0, 1]);
}

#[test]
fn test_draw_fills_board() {
    let mut env = scripted_env(&[4, 1, 6, 5]);

    for action in [0, 2, 3, 7] {
        let step = env.step(action).unwrap();
        assert_eq!(step.info, StepInfo::Continue);
        assert_eq!(step.reward, -0.01);
    }

    let step = env.step(8).unwrap();
    assert_eq!(step.info, StepInfo::Draw);
    assert_eq!(step.reward, 0.0);
    assert!(step.terminated);
    assert!(step.observation.iter().all(|&cell| cell != 0));
}

#[test]
fn test_invalid_action_ends_episode() {
    let mut env = scripted_env(&[4]);
    env.step(0).unwrap();

    let step = env.step(4).unwrap();
    assert_eq!(step.info, StepInfo::InvalidAction);
    assert_eq!(step.reward, -1.0);
    assert!(step.terminated);
    // Board is unchanged by the rejected action.
    assert_eq!(step.observation, [1, 0, 0, 0, 2, 0, 0, 0, 0]);

    assert_eq!(env.step(5), Err(MoveError::GameOver));
}

#[test]
fn test_custom_rewards() {
    let config = agent_first()
        .with_invalid_penalty(-5.0)
        .with_step_penalty(0.0);
    let mut env = TicTacToeEnv::with_opponent(config, Scripted::boxed(&[4]), 0);
    env.reset(None);

    assert_eq!(env.step(0).unwrap().reward, 0.0);
    assert_eq!(env.step(0).unwrap().reward, -5.0);
}

#[test]
fn test_rejected_opponent_reply_leaves_board_unchanged() {
    // Replies 0 to the agent's 0, then 9, then a legal 0.
    let mut env = scripted_env(&[0, 9, 0]);

    assert_eq!(env.step(0), Err(MoveError::SquareOccupied(0)));
    assert_eq!(env.observation(), [0; 9]);
    assert!(!env.is_done());

    assert_eq!(env.step(1), Err(MoveError::OutOfBounds(9)));
    assert_eq!(env.observation(), [0; 9]);
    assert!(!env.is_done());

    let step = env.step(1).unwrap();
    assert_eq!(step.info, StepInfo::Continue);
    assert_eq!(step.observation, [2, 1, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_out_of_bounds_action() {
    let mut env = scripted_env(&[]);
    assert_eq!(env.step(9), Err(MoveError::OutOfBounds(9)));
    assert!(!env.is_done());
}

#[test]
fn test_opponent_moves_first() {
    let config = EnvConfig::default().with_opponent_first_prob(1.0);
    let mut env = TicTacToeEnv::with_opponent(config, Scripted::boxed(&[4]), 0);

    let (obs, info) = env.reset(None);
    assert!(info.opponent_started);
    assert_eq!(obs, [0, 0, 0, 0, 2, 0, 0, 0, 0]);
    assert_eq!(env.board().occupied_count(), 1);
}

#[test]
fn test_reset_clears_finished_episode() {
    let mut env = scripted_env(&[4]);
    env.step(0).unwrap();
    env.step(0).unwrap();
    assert!(env.is_done());

    let (obs, _) = env.reset(None);
    assert_eq!(obs, [0; 9]);
    assert!(!env.is_done());
}

#[test]
fn test_same_seed_same_trajectory() {
    let play = |seed: u64| {
        let mut env = TicTacToeEnv::new(EnvConfig::default(), seed);
        let mut trace = vec![env.reset(Some(seed)).0];
        while !env.is_done() {
            let action = env.board().legal_moves()[0];
            trace.push(env.step(action).unwrap().observation);
        }
        trace
    };

    for seed in 0..10 {
        assert_eq!(play(seed), play(seed));
    }
}

#[test]
fn test_perfect_agent_never_loses() {
    let summary = simulate(EnvConfig::default(), &ExhaustiveSearch, 20, 3).unwrap();
    assert_eq!(summary.episodes, 20);
    assert_eq!(summary.losses, 0);
    assert_eq!(summary.invalid, 0);
    assert_eq!(summary.wins + summary.draws, 20);
}

#[test]
fn test_simulation_is_reproducible() {
    let agent = StrategyKind::Heuristic.build();
    let config = EnvConfig::default().with_opponent(StrategyKind::Heuristic);

    let first = simulate(config, agent.as_ref(), 200, 42).unwrap();
    let second = simulate(config, agent.as_ref(), 200, 42).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.wins + first.losses + first.draws + first.invalid,
        first.episodes
    );
}

#[test]
fn test_empty_simulation() {
    let summary = simulate(EnvConfig::default(), &ExhaustiveSearch, 0, 0).unwrap();
    assert_eq!(summary.episodes, 0);
    assert_eq!(summary.mean_return(), 0.0);
}
