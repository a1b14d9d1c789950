//! Error types for games, configuration and the solver.
//!
//! Everything here is fatal: an error means a state was built wrong or an
//! action was applied that the game never offered. Nothing is retried.

use thiserror::Error;

/// Errors raised by a game implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// An action outside the legal set was applied.
    #[error("illegal action {action} at info set {key}")]
    IllegalAction {
        /// The rejected action.
        action: String,
        /// Information-set key of the state it was applied to.
        key: String,
    },

    /// A hand with the wrong number of cards was passed to an evaluator.
    #[error("invalid hand: expected {expected}, found {found}")]
    InvalidHand {
        /// Description of the expected card counts.
        expected: &'static str,
        /// Description of what was received.
        found: String,
    },

    /// Utility was requested for a state that has not finished.
    #[error("utility requested for a non-terminal state")]
    NotTerminal,

    /// A chance outcome was requested but the deck ran out.
    #[error("deck exhausted while dealing")]
    DeckExhausted,

    /// Text that does not name a card.
    #[error("cannot parse card {0:?}")]
    InvalidCard(String),
}

/// Errors that can occur when validating configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Variant name not recognized.
    #[error("unknown variant {0:?}, expected kuhn or leduc")]
    UnknownVariant(String),

    /// Exploration probability is out of range [0, 1].
    #[error("exploration probability {0} is out of range [0, 1]")]
    InvalidExploration(f64),

    /// The variant cannot be dealt to this many players.
    #[error("{variant} supports 2 to {max} players, got {players}")]
    UnsupportedPlayers {
        /// Variant name.
        variant: &'static str,
        /// Requested player count.
        players: usize,
        /// Largest supported player count.
        max: usize,
    },

    /// Stacks are too short to cover the largest possible commitment.
    #[error("starting stack {stack} cannot cover a maximum commitment of {required}")]
    StackTooShallow {
        /// Configured stack.
        stack: u32,
        /// Largest commitment reachable under the betting rules.
        required: u32,
    },

    /// Bet sizes do not match the number of betting rounds.
    #[error("expected {rounds} positive bet sizes, got {sizes:?}")]
    BetSizes {
        /// Betting rounds in the variant.
        rounds: usize,
        /// Configured sizes.
        sizes: Vec<u32>,
    },

    /// Small blind larger than big blind.
    #[error("small blind {small} exceeds big blind {big}")]
    InvalidBlinds {
        /// Small blind.
        small: u32,
        /// Big blind.
        big: u32,
    },
}

/// Errors surfaced by training and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// A game rule was violated during traversal.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The solver or game configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
