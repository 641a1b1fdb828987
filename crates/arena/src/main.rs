//! Match driver for the UCT search engine.
//!
//! Plays tic-tac-toe series (engine versus a baseline opponent, or engine
//! versus engine) with per-game seeds derived from one base seed, sides
//! alternating between games for fairness, and games of a series played in
//! parallel. Prints a win/draw/loss tally and optionally writes a JSON
//! summary.

mod opponent;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use opponent::{GreedyOpponent, Opponent, RandomOpponent};
use uct_core::GameRules;
use uct_mcts::games::{Mark, TicTacToe, TicTacToeState};
use uct_mcts::{RandomPlayout, SearchConfig, Searcher};

/// UCT match driver.
#[derive(Parser)]
#[command(name = "uct-arena")]
#[command(about = "Play tic-tac-toe match series with the UCT search engine")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "uct_mcts=debug").
    #[arg(long, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Engine versus a baseline opponent.
    Match {
        /// Baseline to play against.
        #[arg(short, long, value_enum, default_value_t = Baseline::Random)]
        opponent: Baseline,

        /// Number of games in the series.
        #[arg(short, long, default_value = "100")]
        games: usize,

        /// Search iterations per engine move.
        #[arg(short, long, default_value = "1000")]
        iterations: usize,

        /// Exploration constant of the UCT policy.
        #[arg(short = 'c', long)]
        exploration: Option<f64>,

        /// Base seed; each game derives its own seed from it.
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write a JSON summary of the series here.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Engine versus engine.
    Duel {
        /// Number of games in the series.
        #[arg(short, long, default_value = "20")]
        games: usize,

        /// Search iterations per engine move.
        #[arg(short, long, default_value = "1000")]
        iterations: usize,

        /// Exploration constant of the UCT policy.
        #[arg(short = 'c', long)]
        exploration: Option<f64>,

        /// Base seed; each game derives its own seed from it.
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write a JSON summary of the series here.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Baseline {
    /// Uniformly random legal moves.
    Random,
    /// Immediate win if available, otherwise random.
    Greedy,
}

impl Baseline {
    fn name(self) -> &'static str {
        match self {
            Baseline::Random => "random",
            Baseline::Greedy => "greedy",
        }
    }
}

/// Series summary. In a duel, "wins" and "losses" count the games of the
/// engine instance that held X in even-numbered games.
#[derive(Serialize)]
struct Summary {
    mode: &'static str,
    opponent: Option<&'static str>,
    games: usize,
    iterations: usize,
    exploration: f64,
    seed: u64,
    wins: usize,
    draws: usize,
    losses: usize,
    elapsed_secs: f64,
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;

    match cli.command {
        Commands::Match {
            opponent,
            games,
            iterations,
            exploration,
            seed,
            output,
        } => {
            let config = search_config(iterations, exploration);
            run_match(opponent, games, config, seed, output)
        }
        Commands::Duel {
            games,
            iterations,
            exploration,
            seed,
            output,
        } => {
            let config = search_config(iterations, exploration);
            run_duel(games, config, seed, output)
        }
    }
}

fn search_config(iterations: usize, exploration: Option<f64>) -> SearchConfig {
    let config = SearchConfig::with_iterations(iterations);
    match exploration {
        Some(c) => config.exploration(c),
        None => config,
    }
}

/// Play one game with the engine holding `engine_mark` against a baseline.
/// Returns the engine's payoff: +1 win, 0 draw, -1 loss.
fn play_baseline_game(
    baseline: Baseline,
    engine_mark: Mark,
    config: &SearchConfig,
    game_seed: u64,
) -> Result<f64> {
    let rules = TicTacToe;
    let mut searcher = Searcher::new(
        config.clone(),
        RandomPlayout::with_cap(
            ChaCha8Rng::seed_from_u64(game_seed),
            config.max_playout_moves,
        ),
    );
    let opponent_rng = ChaCha8Rng::seed_from_u64(game_seed.wrapping_add(1));
    let mut opponent: Box<dyn Opponent<TicTacToe>> = match baseline {
        Baseline::Random => Box::new(RandomOpponent::new(opponent_rng)),
        Baseline::Greedy => Box::new(GreedyOpponent::new(opponent_rng)),
    };

    let mut state = TicTacToeState::new();
    while !rules.is_terminal(&state) {
        let mv = if state.to_move() == engine_mark {
            searcher.decide(&rules, &state)?
        } else {
            opponent.pick(&rules, &state)?
        };
        state = rules.next_state(&state, mv)?;
    }

    Ok(rules.payoff(&state, engine_mark.player())?)
}

/// Play one engine-versus-engine game. Returns the payoff of the engine
/// holding `first_mark`.
fn play_duel_game(first_mark: Mark, config: &SearchConfig, game_seed: u64) -> Result<f64> {
    let rules = TicTacToe;
    let mut first = Searcher::new(
        config.clone(),
        RandomPlayout::with_cap(
            ChaCha8Rng::seed_from_u64(game_seed),
            config.max_playout_moves,
        ),
    );
    let mut second = Searcher::new(
        config.clone(),
        RandomPlayout::with_cap(
            ChaCha8Rng::seed_from_u64(game_seed.wrapping_add(1)),
            config.max_playout_moves,
        ),
    );

    let mut state = TicTacToeState::new();
    while !rules.is_terminal(&state) {
        let mv = if state.to_move() == first_mark {
            first.decide(&rules, &state)?
        } else {
            second.decide(&rules, &state)?
        };
        state = rules.next_state(&state, mv)?;
    }

    Ok(rules.payoff(&state, first_mark.player())?)
}

fn run_match(
    baseline: Baseline,
    games: usize,
    config: SearchConfig,
    seed: u64,
    output: Option<PathBuf>,
) -> Result<()> {
    info!(
        games,
        iterations = config.iterations,
        opponent = baseline.name(),
        "starting match series"
    );
    println!(
        "Playing {} games: engine ({} iterations) vs {}",
        games,
        config.iterations,
        baseline.name()
    );
    println!("================================================");

    let start = Instant::now();
    let payoffs = (0..games)
        .into_par_iter()
        .map(|i| {
            // Alternate sides for fairness.
            let engine_mark = if i % 2 == 0 { Mark::X } else { Mark::O };
            let game_seed = seed.wrapping_add(i as u64 * 1000);
            play_baseline_game(baseline, engine_mark, &config, game_seed)
        })
        .collect::<Result<Vec<f64>>>()?;
    let elapsed = start.elapsed();

    let summary = tally(
        "match",
        Some(baseline.name()),
        &payoffs,
        &config,
        seed,
        elapsed.as_secs_f64(),
    );
    report(&summary);
    if let Some(path) = output {
        write_summary(&summary, &path)?;
    }
    Ok(())
}

fn run_duel(games: usize, config: SearchConfig, seed: u64, output: Option<PathBuf>) -> Result<()> {
    info!(games, iterations = config.iterations, "starting duel series");
    println!(
        "Playing {} games: engine vs engine ({} iterations each)",
        games, config.iterations
    );
    println!("================================================");

    let start = Instant::now();
    let payoffs = (0..games)
        .into_par_iter()
        .map(|i| {
            let first_mark = if i % 2 == 0 { Mark::X } else { Mark::O };
            let game_seed = seed.wrapping_add(i as u64 * 1000);
            play_duel_game(first_mark, &config, game_seed)
        })
        .collect::<Result<Vec<f64>>>()?;
    let elapsed = start.elapsed();

    let summary = tally("duel", None, &payoffs, &config, seed, elapsed.as_secs_f64());
    report(&summary);
    if let Some(path) = output {
        write_summary(&summary, &path)?;
    }
    Ok(())
}

fn tally(
    mode: &'static str,
    opponent: Option<&'static str>,
    payoffs: &[f64],
    config: &SearchConfig,
    seed: u64,
    elapsed_secs: f64,
) -> Summary {
    let wins = payoffs.iter().filter(|p| **p > 0.5).count();
    let losses = payoffs.iter().filter(|p| **p < -0.5).count();
    let draws = payoffs.len() - wins - losses;

    Summary {
        mode,
        opponent,
        games: payoffs.len(),
        iterations: config.iterations,
        exploration: config.exploration,
        seed,
        wins,
        draws,
        losses,
        elapsed_secs,
    }
}

fn report(summary: &Summary) {
    let pct = |n: usize| 100.0 * n as f64 / summary.games.max(1) as f64;

    println!("\n================================================");
    println!("FINAL RESULTS");
    println!("================================================");
    println!("Wins:   {} ({:.1}%)", summary.wins, pct(summary.wins));
    println!("Draws:  {} ({:.1}%)", summary.draws, pct(summary.draws));
    println!("Losses: {} ({:.1}%)", summary.losses, pct(summary.losses));
    println!("------------------------------------------------");
    println!("Completed in {:.2}s", summary.elapsed_secs);
}

fn write_summary(summary: &Summary, path: &PathBuf) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create summary file {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("failed to write summary to {:?}", path))?;
    println!("Summary written to {:?}", path);
    Ok(())
}
