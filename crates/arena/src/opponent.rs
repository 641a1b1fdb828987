//! Baseline opponents for match play.
//!
//! These set the bar the engine must clear: losing a series to either of
//! them means the search is broken, not merely weak.

use rand::Rng;

use uct_core::{GameRules, Result, UctError};

/// A baseline move picker.
pub trait Opponent<G: GameRules> {
    /// Pick a move in a non-terminal state.
    fn pick(&mut self, rules: &G, state: &G::State) -> Result<G::Move>;
}

/// Plays a uniformly random legal move.
pub struct RandomOpponent<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomOpponent<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<G: GameRules, R: Rng> Opponent<G> for RandomOpponent<R> {
    fn pick(&mut self, rules: &G, state: &G::State) -> Result<G::Move> {
        let moves = rules.legal_moves(state);
        if moves.is_empty() {
            return Err(UctError::NoLegalMoves);
        }
        Ok(moves[self.rng.gen_range(0..moves.len())])
    }
}

/// Takes an immediately winning move when one exists, otherwise plays a
/// uniformly random legal move. One ply of lookahead, no defense.
pub struct GreedyOpponent<R: Rng> {
    rng: R,
}

impl<R: Rng> GreedyOpponent<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<G: GameRules, R: Rng> Opponent<G> for GreedyOpponent<R> {
    fn pick(&mut self, rules: &G, state: &G::State) -> Result<G::Move> {
        let moves = rules.legal_moves(state);
        if moves.is_empty() {
            return Err(UctError::NoLegalMoves);
        }

        let mover = rules.current_player(state);
        for &mv in &moves {
            let next = rules.next_state(state, mv)?;
            if rules.is_terminal(&next) && rules.payoff(&next, mover)? > 0.0 {
                return Ok(mv);
            }
        }
        Ok(moves[self.rng.gen_range(0..moves.len())])
    }
}
