//! The search driver: selection, expansion, playout, backpropagation.
//!
//! One [`Searcher::search`] call builds a fresh tree rooted at the given
//! state, spends the configured iteration budget growing it, and picks the
//! root move with the best mean outcome from the root player's point of
//! view. The tree is discarded when the call returns; nothing is carried
//! between decisions.

use std::marker::PhantomData;

use rand::Rng;
use tracing::{debug, trace};

use uct_core::{GameRules, PlayerId, Result, UctError};

use crate::config::SearchConfig;
use crate::node::NodeId;
use crate::playout::{Playout, RandomPlayout};
use crate::tree::Tree;

/// Statistics for one root move after a search.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveStats<M> {
    /// The root move.
    pub mv: M,

    /// How many iterations descended through this move.
    pub visits: u32,

    /// Mean outcome of those iterations, from the root player's point of
    /// view (+1 winning, -1 losing).
    pub mean_outcome: f64,
}

/// Result of one search run.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchReport<M> {
    /// The chosen move: best mean outcome at the root, ties going to the
    /// first move expanded.
    pub best_move: M,

    /// Per-move statistics for every root child, in expansion order.
    pub move_stats: Vec<MoveStats<M>>,

    /// Total visits at the root; equals the number of iterations run.
    pub root_visits: u32,
}

/// UCT Monte Carlo Tree Search.
///
/// Generic over:
/// - `G`: the game being searched
/// - `P`: the playout strategy estimating leaf positions
///
/// The searcher holds no per-decision state; it can be reused across moves
/// and games. Each search is single-threaded and owns its tree exclusively.
pub struct Searcher<G: GameRules, P: Playout<G>> {
    config: SearchConfig,
    playout: P,
    _rules: PhantomData<G>,
}

impl<G, P> Searcher<G, P>
where
    G: GameRules,
    P: Playout<G>,
{
    /// Create a searcher with the given configuration and playout strategy.
    pub fn new(config: SearchConfig, playout: P) -> Self {
        Self {
            config,
            playout,
            _rules: PhantomData,
        }
    }

    /// Run a full search and return just the chosen move.
    pub fn decide(&mut self, rules: &G, state: &G::State) -> Result<G::Move> {
        Ok(self.search(rules, state)?.best_move)
    }

    /// Run a full search from `state`, returning the chosen move together
    /// with per-move statistics.
    ///
    /// Fails with [`UctError::InvalidState`] when `state` is terminal:
    /// there is no move to return.
    pub fn search(&mut self, rules: &G, state: &G::State) -> Result<SearchReport<G::Move>> {
        let tree = self.run(rules, state)?;

        // Scores at the root are flipped into the root player's point of
        // view with the same sign used during selection.
        let sign = rules.current_player(state).outcome_sign();

        let move_stats: Vec<MoveStats<G::Move>> = tree
            .root()
            .children
            .iter()
            .map(|(mv, id)| {
                let child = tree.get(*id);
                MoveStats {
                    mv: *mv,
                    visits: child.visits,
                    mean_outcome: sign * child.mean_outcome(),
                }
            })
            .collect();

        // Strictly-greater comparison: ties go to the first child in
        // expansion order, which keeps reruns reproducible.
        let mut best: Option<&MoveStats<G::Move>> = None;
        for stats in &move_stats {
            if best.map_or(true, |b| stats.mean_outcome > b.mean_outcome) {
                best = Some(stats);
            }
        }
        let best = best.expect("BUG: search ran at least one iteration but root has no children");

        debug!(
            best_move = ?best.mv,
            mean_outcome = best.mean_outcome,
            root_visits = tree.root().visits,
            "search complete"
        );

        Ok(SearchReport {
            best_move: best.mv,
            root_visits: tree.root().visits,
            move_stats,
        })
    }

    /// Build and grow the tree for one decision.
    fn run(&mut self, rules: &G, state: &G::State) -> Result<Tree<G::Move>> {
        let root_moves = rules.legal_moves(state);
        if root_moves.is_empty() {
            return Err(UctError::InvalidState);
        }

        let mut tree = Tree::new(root_moves);

        // At least one iteration, so the root always gains a child.
        for iteration in 0..self.config.iterations.max(1) {
            let outcome = self.simulate(rules, state, &mut tree)?;
            trace!(iteration, tree_nodes = tree.len(), outcome, "iteration complete");
        }
        Ok(tree)
    }

    /// One select / expand / playout / backpropagate round.
    ///
    /// Returns the outcome scalar that was backpropagated, scored from
    /// `PlayerId::One`'s point of view.
    fn simulate(&mut self, rules: &G, root_state: &G::State, tree: &mut Tree<G::Move>) -> Result<f64> {
        // Selection: descend while the current node is fully expanded and
        // has somewhere to go, carrying the game state along the path.
        let mut state = root_state.clone();
        let mut node_id = NodeId::ROOT;
        loop {
            let node = tree.get(node_id);
            if node.is_expandable() || node.children.is_empty() {
                break;
            }
            let sign = rules.current_player(&state).outcome_sign();
            let parent_visits = node.visits;

            let mut chosen: Option<(G::Move, NodeId, f64)> = None;
            for (mv, child_id) in &node.children {
                let score = tree
                    .get(*child_id)
                    .uct_score(sign, parent_visits, self.config.exploration);
                if chosen.map_or(true, |(_, _, best)| score > best) {
                    chosen = Some((*mv, *child_id, score));
                }
            }
            let (mv, child_id, _) =
                chosen.expect("BUG: selection descended into a node without children");

            state = rules.next_state(&state, mv)?;
            node_id = child_id;
        }

        // Expansion: materialize one child from the untried moves, then
        // estimate it with a playout. A leaf with nothing to expand and no
        // children is a terminal position scored directly.
        let untried = tree.get_mut(node_id).untried_moves.pop();
        let (simulated, outcome) = match untried {
            Some(mv) => {
                let child_state = rules.next_state(&state, mv)?;
                let child_moves = rules.legal_moves(&child_state);
                let child_id = tree.add_child(node_id, mv, child_moves);

                let terminal = self.playout.run(rules, child_state)?;
                (child_id, rules.payoff(&terminal, PlayerId::One)?)
            }
            None => (node_id, rules.payoff(&state, PlayerId::One)?),
        };

        tree.backpropagate(simulated, outcome);
        Ok(outcome)
    }
}

/// Convenience entry point: search `state` with uniform random playouts and
/// return the chosen move.
pub fn decide<G, R>(rules: &G, state: &G::State, config: SearchConfig, rng: R) -> Result<G::Move>
where
    G: GameRules,
    R: Rng,
{
    let playout = RandomPlayout::with_cap(rng, config.max_playout_moves);
    Searcher::new(config, playout).decide(rules, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playout::FirstMovePlayout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    // Nim with a small pile: players alternate removing 1 or 2 stones,
    // whoever takes the last stone wins. Always decisive, trivially finite,
    // and small enough to search exhaustively.
    #[derive(Clone)]
    struct Nim;

    #[derive(Clone, PartialEq, Eq, Debug)]
    struct NimState {
        pile: u8,
        to_move: PlayerId,
    }

    impl NimState {
        fn with_pile(pile: u8) -> Self {
            NimState {
                pile,
                to_move: PlayerId::One,
            }
        }
    }

    impl GameRules for Nim {
        type State = NimState;
        type Move = u8;

        fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move> {
            (1..=2).filter(|take| *take <= state.pile).collect()
        }

        fn next_state(&self, state: &Self::State, mv: Self::Move) -> Result<Self::State> {
            if mv == 0 || mv > 2 || mv > state.pile {
                return Err(UctError::IllegalMove);
            }
            Ok(NimState {
                pile: state.pile - mv,
                to_move: state.to_move.opponent(),
            })
        }

        fn is_terminal(&self, state: &Self::State) -> bool {
            state.pile == 0
        }

        fn current_player(&self, state: &Self::State) -> PlayerId {
            state.to_move
        }

        fn payoff(&self, state: &Self::State, player: PlayerId) -> Result<f64> {
            if !self.is_terminal(state) {
                return Err(UctError::NotTerminal);
            }
            // The player who took the last stone is the one not to move.
            Ok(if state.to_move == player { -1.0 } else { 1.0 })
        }
    }

    fn searcher(iterations: usize) -> Searcher<Nim, RandomPlayout<ChaCha8Rng>> {
        Searcher::new(
            SearchConfig::with_iterations(iterations),
            RandomPlayout::new(ChaCha8Rng::seed_from_u64(42)),
        )
    }

    #[test]
    fn test_terminal_root_is_invalid_state() {
        let err = searcher(100)
            .search(&Nim, &NimState::with_pile(0))
            .unwrap_err();
        assert_eq!(err, UctError::InvalidState);
    }

    #[test]
    fn test_root_visits_equal_iteration_budget() {
        for budget in [1, 10, 137] {
            let tree = searcher(budget)
                .run(&Nim, &NimState::with_pile(7))
                .unwrap();
            assert_eq!(tree.root().visits, budget as u32);
        }
    }

    #[test]
    fn test_finds_win_in_one() {
        // Taking both stones wins on the spot; taking one hands the win to
        // the opponent.
        let report = searcher(200)
            .search(&Nim, &NimState::with_pile(2))
            .unwrap();
        assert_eq!(report.best_move, 2);

        let winning = report.move_stats.iter().find(|s| s.mv == 2).unwrap();
        assert_eq!(winning.mean_outcome, 1.0);
    }

    #[test]
    fn test_expansion_exhaustion_is_a_no_op() {
        // Pile of one: a single untried move. The first iteration expands
        // it; every later iteration lands on the terminal child and scores
        // it without growing the tree.
        let mut s = searcher(50);
        let tree = s.run(&Nim, &NimState::with_pile(1)).unwrap();

        assert_eq!(tree.len(), 2);
        assert!(tree.root().untried_moves.is_empty());
        assert_eq!(tree.root().children.len(), 1);
        assert_eq!(tree.root().visits, 50);
    }

    #[test]
    fn test_tree_invariants_after_search() {
        let tree = searcher(200).run(&Nim, &NimState::with_pile(9)).unwrap();

        for node in tree.nodes() {
            // A child cannot be visited more often than its parent.
            for (_, child_id) in &node.children {
                assert!(node.visits >= tree.get(*child_id).visits);
            }

            // Expanded and untried moves never overlap.
            let expanded: HashSet<u8> = node.children.iter().map(|(mv, _)| *mv).collect();
            assert!(node.untried_moves.iter().all(|mv| !expanded.contains(mv)));
        }
    }

    #[test]
    fn test_deterministic_with_stubbed_playout() {
        // With the randomness stubbed out, identical inputs must produce
        // identical statistics and the identical move.
        let run = || {
            Searcher::new(SearchConfig::with_iterations(80), FirstMovePlayout::new())
                .search(&Nim, &NimState::with_pile(8))
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_deterministic_with_seeded_rng() {
        let run = || {
            searcher(120)
                .search(&Nim, &NimState::with_pile(8))
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_decide_convenience_returns_legal_move() {
        let state = NimState::with_pile(5);
        let mv = decide(
            &Nim,
            &state,
            SearchConfig::with_iterations(100),
            ChaCha8Rng::seed_from_u64(7),
        )
        .unwrap();
        assert!(Nim.legal_moves(&state).contains(&mv));
    }

    #[test]
    fn test_second_player_perspective() {
        // Same win-in-one, but player two to move: the sign flip must make
        // the winning move best for them as well.
        let state = NimState {
            pile: 2,
            to_move: PlayerId::Two,
        };
        let report = searcher(200).search(&Nim, &state).unwrap();
        assert_eq!(report.best_move, 2);

        let winning = report.move_stats.iter().find(|s| s.mv == 2).unwrap();
        assert_eq!(winning.mean_outcome, 1.0);
    }
}
