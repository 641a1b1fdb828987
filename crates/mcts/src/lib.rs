//! UCT Monte Carlo Tree Search.
//!
//! This crate provides a game-agnostic MCTS engine for two-player,
//! perfect-information, alternating-turn games. Any game implementing the
//! `uct_core::GameRules` trait can be searched.
//!
//! # Features
//!
//! - **Generic**: works with any `GameRules` implementation
//! - **UCT selection**: upper-confidence-bound tree policy with a tunable
//!   exploration constant
//! - **Playout abstraction**: uniform random playouts by default, with a
//!   win-biased variant and a deterministic stub for tests
//! - **Deterministic**: seeded generators and documented tie-breaking make
//!   whole searches reproducible
//!
//! # Example
//!
//! ```
//! use uct_mcts::{games::TicTacToe, RandomPlayout, SearchConfig, Searcher};
//! use uct_mcts::games::TicTacToeState;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let rules = TicTacToe;
//! let state = TicTacToeState::new();
//!
//! let config = SearchConfig::with_iterations(200);
//! let playout = RandomPlayout::new(ChaCha8Rng::seed_from_u64(42));
//! let mut searcher = Searcher::new(config, playout);
//!
//! let report = searcher.search(&rules, &state).expect("fresh board is not terminal");
//! println!("best move: {}", report.best_move);
//! ```

pub mod config;
pub mod games;
mod node;
pub mod playout;
pub mod search;
mod tree;

pub use config::SearchConfig;
pub use playout::{FirstMovePlayout, GreedyWinPlayout, Playout, RandomPlayout};
pub use search::{decide, MoveStats, SearchReport, Searcher};
