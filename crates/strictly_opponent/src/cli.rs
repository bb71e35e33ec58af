//! Command-line interface for strictly_opponent.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_minimax::{Board, Player, StrategyKind};

/// Strictly Opponent - never-lose tic-tac-toe move decisions
#[derive(Parser, Debug)]
#[command(name = "strictly_opponent")]
#[command(about = "Tic-tac-toe move decisions with LLM suggestions and minimax fallback", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the minimax value and best move for a position
    Solve {
        /// Board as nine squares, e.g. "XX..O...."
        #[arg(short, long)]
        board: Board,

        /// Side to move
        #[arg(short, long, default_value = "O")]
        mark: Player,
    },

    /// Resolve a move, asking the LLM first when a credential is set
    Suggest {
        /// Board as nine squares, e.g. "XX..O...."
        #[arg(short, long)]
        board: Board,

        /// Side to move (defaults to the config file's mark)
        #[arg(short, long)]
        mark: Option<Player>,
    },

    /// Play episodes in the training environment and report results
    Simulate {
        /// Number of episodes
        #[arg(short, long, default_value = "1000")]
        episodes: usize,

        /// Seed for the environment and agent
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Strategy the agent (X) plays
        #[arg(short, long, default_value = "heuristic")]
        agent: StrategyKind,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}
