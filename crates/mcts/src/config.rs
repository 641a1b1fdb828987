//! Search configuration parameters.

use crate::playout::DEFAULT_PLAYOUT_CAP;

/// Tunables for one search run.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Iteration budget: how many select/expand/playout/backpropagate
    /// rounds to run per decision. At least one iteration always runs, so
    /// the root is guaranteed a child to pick from.
    pub iterations: usize,

    /// Exploration constant of the UCT formula. Higher values favor
    /// under-visited moves, lower values favor the current best estimate.
    /// sqrt(2) is the classic choice for outcomes in [-1, 1].
    pub exploration: f64,

    /// Safety cap on playout length, surfaced as an adapter defect when
    /// exceeded.
    pub max_playout_moves: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration: std::f64::consts::SQRT_2,
            max_playout_moves: DEFAULT_PLAYOUT_CAP,
        }
    }
}

impl SearchConfig {
    /// Create a config with the given iteration budget.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    /// Set the exploration constant.
    pub fn exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Set the playout move cap.
    pub fn max_playout_moves(mut self, max_playout_moves: usize) -> Self {
        self.max_playout_moves = max_playout_moves;
        self
    }
}
