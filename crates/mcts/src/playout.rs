//! Playout (simulation) strategies.
//!
//! The `Playout` trait is the seam between tree search and position
//! estimation: given a state, play the game to completion and hand the
//! terminal state back to the driver, which turns it into an outcome
//! scalar exactly once. Swapping the implementation swaps the estimate:
//! uniform random for the classic Monte Carlo rollout, or a deterministic
//! stub when tests need the randomness gone.

use rand::Rng;

use uct_core::{GameRules, Result, UctError};

/// Default cap on playout length. Any finite game the engine is meant for
/// ends well before this; hitting the cap means the rules adapter never
/// terminates and is reported as such.
pub const DEFAULT_PLAYOUT_CAP: usize = 512;

/// A strategy for playing a game out to a terminal state.
pub trait Playout<G: GameRules> {
    /// Play from `state` until `rules.is_terminal` holds, returning the
    /// terminal state reached. If `state` is already terminal it is
    /// returned unchanged.
    fn run(&mut self, rules: &G, state: G::State) -> Result<G::State>;
}

/// Uniform random playout: at every step, one of the legal moves is picked
/// uniformly at random.
#[derive(Clone, Debug)]
pub struct RandomPlayout<R: Rng> {
    rng: R,
    max_moves: usize,
}

impl<R: Rng> RandomPlayout<R> {
    /// Create a playout with the default move cap.
    pub fn new(rng: R) -> Self {
        Self::with_cap(rng, DEFAULT_PLAYOUT_CAP)
    }

    /// Create a playout that aborts after `max_moves` moves.
    pub fn with_cap(rng: R, max_moves: usize) -> Self {
        Self { rng, max_moves }
    }
}

impl<G: GameRules, R: Rng> Playout<G> for RandomPlayout<R> {
    fn run(&mut self, rules: &G, mut state: G::State) -> Result<G::State> {
        for _ in 0..self.max_moves {
            if rules.is_terminal(&state) {
                return Ok(state);
            }
            let moves = rules.legal_moves(&state);
            if moves.is_empty() {
                return Err(UctError::NoLegalMoves);
            }
            let mv = moves[self.rng.gen_range(0..moves.len())];
            state = rules.next_state(&state, mv)?;
        }
        if rules.is_terminal(&state) {
            Ok(state)
        } else {
            Err(UctError::PlayoutCapExceeded(self.max_moves))
        }
    }
}

/// Random playout biased toward immediate wins: whenever the player to move
/// has a move that ends the game in their favor, that move is played;
/// otherwise the step is uniform random.
///
/// A slightly stronger estimator than [`RandomPlayout`] on games with
/// frequent tactical one-movers, at the cost of trying every legal move at
/// every step.
#[derive(Clone, Debug)]
pub struct GreedyWinPlayout<R: Rng> {
    rng: R,
    max_moves: usize,
}

impl<R: Rng> GreedyWinPlayout<R> {
    /// Create a playout with the default move cap.
    pub fn new(rng: R) -> Self {
        Self::with_cap(rng, DEFAULT_PLAYOUT_CAP)
    }

    /// Create a playout that aborts after `max_moves` moves.
    pub fn with_cap(rng: R, max_moves: usize) -> Self {
        Self { rng, max_moves }
    }

    fn winning_move<G: GameRules>(
        rules: &G,
        state: &G::State,
        moves: &[G::Move],
    ) -> Result<Option<G::State>> {
        let mover = rules.current_player(state);
        for &mv in moves {
            let next = rules.next_state(state, mv)?;
            if rules.is_terminal(&next) && rules.payoff(&next, mover)? > 0.0 {
                return Ok(Some(next));
            }
        }
        Ok(None)
    }
}

impl<G: GameRules, R: Rng> Playout<G> for GreedyWinPlayout<R> {
    fn run(&mut self, rules: &G, mut state: G::State) -> Result<G::State> {
        for _ in 0..self.max_moves {
            if rules.is_terminal(&state) {
                return Ok(state);
            }
            let moves = rules.legal_moves(&state);
            if moves.is_empty() {
                return Err(UctError::NoLegalMoves);
            }
            state = match Self::winning_move(rules, &state, &moves)? {
                Some(won) => won,
                None => rules.next_state(&state, moves[self.rng.gen_range(0..moves.len())])?,
            };
        }
        if rules.is_terminal(&state) {
            Ok(state)
        } else {
            Err(UctError::PlayoutCapExceeded(self.max_moves))
        }
    }
}

/// Deterministic playout that always takes the first legal move.
///
/// Useless as an estimator; exists so tests can strip every source of
/// randomness out of a search and compare runs exactly.
#[derive(Clone, Copy, Debug)]
pub struct FirstMovePlayout {
    max_moves: usize,
}

impl FirstMovePlayout {
    pub fn new() -> Self {
        Self {
            max_moves: DEFAULT_PLAYOUT_CAP,
        }
    }
}

impl Default for FirstMovePlayout {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameRules> Playout<G> for FirstMovePlayout {
    fn run(&mut self, rules: &G, mut state: G::State) -> Result<G::State> {
        for _ in 0..self.max_moves {
            if rules.is_terminal(&state) {
                return Ok(state);
            }
            let moves = rules.legal_moves(&state);
            if moves.is_empty() {
                return Err(UctError::NoLegalMoves);
            }
            state = rules.next_state(&state, moves[0])?;
        }
        if rules.is_terminal(&state) {
            Ok(state)
        } else {
            Err(UctError::PlayoutCapExceeded(self.max_moves))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uct_core::PlayerId;

    // Counting game: players alternate adding 1 or 2 to a total; whoever
    // reaches the target exactly wins. Never draws, always terminates.
    #[derive(Clone)]
    struct CountTo(u8);

    #[derive(Clone)]
    struct CountState {
        total: u8,
        to_move: PlayerId,
    }

    impl GameRules for CountTo {
        type State = CountState;
        type Move = u8;

        fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move> {
            if state.total >= self.0 {
                Vec::new()
            } else {
                (1..=2).filter(|step| state.total + step <= self.0).collect()
            }
        }

        fn next_state(&self, state: &Self::State, mv: Self::Move) -> Result<Self::State> {
            if !self.legal_moves(state).contains(&mv) {
                return Err(UctError::IllegalMove);
            }
            Ok(CountState {
                total: state.total + mv,
                to_move: state.to_move.opponent(),
            })
        }

        fn is_terminal(&self, state: &Self::State) -> bool {
            state.total >= self.0
        }

        fn current_player(&self, state: &Self::State) -> PlayerId {
            state.to_move
        }

        fn payoff(&self, state: &Self::State, player: PlayerId) -> Result<f64> {
            if !self.is_terminal(state) {
                return Err(UctError::NotTerminal);
            }
            // The player who moved last reached the target and won.
            Ok(if state.to_move == player { -1.0 } else { 1.0 })
        }
    }

    fn start() -> CountState {
        CountState {
            total: 0,
            to_move: PlayerId::One,
        }
    }

    #[test]
    fn test_random_playout_reaches_terminal() {
        let rules = CountTo(5);
        let mut playout = RandomPlayout::new(ChaCha8Rng::seed_from_u64(42));
        let terminal = playout.run(&rules, start()).unwrap();
        assert!(rules.is_terminal(&terminal));
    }

    #[test]
    fn test_playout_returns_terminal_state_unchanged() {
        let rules = CountTo(5);
        let mut playout = RandomPlayout::new(ChaCha8Rng::seed_from_u64(42));
        let terminal = CountState {
            total: 5,
            to_move: PlayerId::Two,
        };
        let result = playout.run(&rules, terminal).unwrap();
        assert_eq!(result.total, 5);
    }

    #[test]
    fn test_playout_cap_reports_adapter_defect() {
        // An adapter whose game never ends.
        #[derive(Clone)]
        struct Endless;

        impl GameRules for Endless {
            type State = ();
            type Move = u8;

            fn legal_moves(&self, _: &Self::State) -> Vec<Self::Move> {
                vec![0]
            }
            fn next_state(&self, _: &Self::State, _: Self::Move) -> Result<Self::State> {
                Ok(())
            }
            fn is_terminal(&self, _: &Self::State) -> bool {
                false
            }
            fn current_player(&self, _: &Self::State) -> PlayerId {
                PlayerId::One
            }
            fn payoff(&self, _: &Self::State, _: PlayerId) -> Result<f64> {
                Err(UctError::NotTerminal)
            }
        }

        let mut playout = RandomPlayout::with_cap(ChaCha8Rng::seed_from_u64(0), 16);
        let err = playout.run(&Endless, ()).unwrap_err();
        assert_eq!(err, UctError::PlayoutCapExceeded(16));
    }

    #[test]
    fn test_greedy_win_playout_takes_the_winning_step() {
        // Total 3 of 5: stepping 2 wins immediately for the mover.
        let rules = CountTo(5);
        let state = CountState {
            total: 3,
            to_move: PlayerId::One,
        };
        let mut playout = GreedyWinPlayout::new(ChaCha8Rng::seed_from_u64(7));
        let terminal = playout.run(&rules, state).unwrap();
        assert_eq!(terminal.total, 5);
        assert_eq!(rules.payoff(&terminal, PlayerId::One).unwrap(), 1.0);
    }

    #[test]
    fn test_first_move_playout_is_deterministic() {
        let rules = CountTo(9);
        let mut playout = FirstMovePlayout::new();
        let a = playout.run(&rules, start()).unwrap();
        let b = playout.run(&rules, start()).unwrap();
        assert_eq!(a.total, b.total);
        assert_eq!(a.to_move, b.to_move);
    }
}
