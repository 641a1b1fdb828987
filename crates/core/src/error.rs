use thiserror::Error;

/// Errors surfaced by the search engine or by a rules adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UctError {
    /// A search was started from a terminal state: there is no move to pick.
    #[error("cannot search from a terminal state: the root has no legal moves")]
    InvalidState,

    /// The rules adapter rejected a move the engine obtained from its own
    /// `legal_moves` listing. Indicates an adapter/engine mismatch, never
    /// retried.
    #[error("rules adapter rejected a move it reported as legal")]
    IllegalMove,

    /// A non-terminal state reported an empty legal-move list.
    #[error("no legal moves in a non-terminal state")]
    NoLegalMoves,

    /// A playout ran past its move cap without reaching a terminal state.
    /// Guards against rules adapters whose games never end.
    #[error("playout exceeded {0} moves without reaching a terminal state")]
    PlayoutCapExceeded(usize),

    /// A payoff was requested for a state the game has not finished.
    #[error("payoff requested for a non-terminal state")]
    NotTerminal,
}

/// Convenience Result type for engine operations
pub type Result<T> = std::result::Result<T, UctError>;
