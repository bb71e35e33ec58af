//! Strictly Opponent - Unified CLI
//!
//! Solve positions, resolve moves and generate training episodes.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use strictly_minimax::{Board, Player, StrategyKind, search};
use strictly_opponent::{LlmClient, MoveResolver, OpponentConfig, simulate};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Solve { board, mark } => run_solve(board, mark),
        Command::Suggest { board, mark } => run_suggest(&config, board, mark).await,
        Command::Simulate {
            episodes,
            seed,
            agent,
            json,
        } => run_simulate(&config, episodes, seed, agent, json),
    }
}

fn load_config(path: Option<&Path>) -> Result<OpponentConfig> {
    match path {
        Some(path) => Ok(OpponentConfig::from_file(path)?),
        None => Ok(OpponentConfig::default()),
    }
}

/// Print the exhaustive search result for a position
#[instrument(skip(board), fields(board = %board.to_compact()))]
fn run_solve(board: Board, mark: Player) -> Result<()> {
    let result = search(&board, mark);
    println!("{}\n", board);
    match result.best_move {
        Some(pos) => println!("{} to move: value {}, best move {}", mark, result.value, pos),
        None => println!("Game over: value {} for {}", result.value, mark),
    }
    Ok(())
}

/// Resolve one move through the LLM-with-fallback path
#[instrument(skip(config, board), fields(board = %board.to_compact()))]
async fn run_suggest(config: &OpponentConfig, board: Board, mark: Option<Player>) -> Result<()> {
    let mark = mark.unwrap_or(*config.mark());
    let client = LlmClient::new(config.create_llm_config());
    let resolver = MoveResolver::new(client, mark);

    let resolution = resolver.resolve_move(&board).await?;
    info!(
        mark = %resolver.mark(),
        position = resolution.position,
        source = %resolution.source,
        "Move resolved"
    );
    println!("{}", resolution);
    Ok(())
}

/// Generate episodes and print the outcome totals
#[instrument(skip(config))]
fn run_simulate(
    config: &OpponentConfig,
    episodes: usize,
    seed: u64,
    agent: StrategyKind,
    json: bool,
) -> Result<()> {
    let strategy = agent.build();
    let summary = simulate(*config.env(), strategy.as_ref(), episodes, seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "agent={} opponent={} episodes={} wins={} losses={} draws={} invalid={} mean_return={:.4}",
            agent,
            config.env().opponent,
            summary.episodes,
            summary.wins,
            summary.losses,
            summary.draws,
            summary.invalid,
            summary.mean_return()
        );
    }
    Ok(())
}
