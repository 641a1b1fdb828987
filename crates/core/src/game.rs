use std::fmt::Debug;
use std::hash::Hash;

use crate::{PlayerId, Result};

/// The rules adapter a game supplies to the search engine.
///
/// The engine is game-agnostic: everything it knows about the game flows
/// through this trait. Implementations must describe a two-player,
/// perfect-information, alternating-turn game with a finite branching
/// factor (tic-tac-toe, connect-four, and the like).
///
/// Implementations must keep `legal_moves`, `next_state` and `is_terminal`
/// mutually consistent: `legal_moves` returns an empty list exactly on
/// terminal states, and `next_state` accepts exactly the moves `legal_moves`
/// listed. The engine treats any disagreement as a defect and aborts the
/// search rather than papering over it.
pub trait GameRules: Clone + Send + Sync {
    /// One point in the game. Cloned freely during search, so keep it cheap
    /// to copy.
    type State: Clone + Send;

    /// One legal transition out of a state.
    type Move: Copy + Eq + Hash + Send + Debug;

    /// All moves available to the player to move. Empty iff `state` is
    /// terminal.
    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Deterministic transition. Fails with [`UctError::IllegalMove`] if
    /// `mv` is not currently legal.
    ///
    /// [`UctError::IllegalMove`]: crate::UctError::IllegalMove
    fn next_state(&self, state: &Self::State, mv: Self::Move) -> Result<Self::State>;

    /// Whether the game has ended in `state`.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// The player to move in `state`.
    fn current_player(&self, state: &Self::State) -> PlayerId;

    /// Terminal payoff from `player`'s perspective: conventionally +1.0 for
    /// a win, 0.0 for a draw, -1.0 for a loss. Fails with
    /// [`UctError::NotTerminal`] if the game is still in progress.
    ///
    /// [`UctError::NotTerminal`]: crate::UctError::NotTerminal
    fn payoff(&self, state: &Self::State, player: PlayerId) -> Result<f64>;
}
