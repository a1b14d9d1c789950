//! Game trait definition for CFR solver.
//!
//! Any game that implements the `Game` trait can be trained and evaluated.
//! This provides a clean abstraction between the algorithm and specific games.

use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;

use crate::cfr::error::GameError;

/// Trait for actions that can be taken in a game.
///
/// Actions must be cloneable, comparable, and hashable for storage in maps.
pub trait Action: Clone + Eq + Hash + Debug + Send + Sync {
    /// Short code used when the action is written into a history.
    fn code(&self) -> String;
}

/// Trait for information states (what a player knows at a decision point).
///
/// Two game states that look identical to the acting player (same private
/// cards, same public history) must produce the same key, and two states
/// the player can tell apart must not.
pub trait InfoState: Clone + Eq + Hash + Debug + Send + Sync {
    /// Generate a unique string key for this information state.
    /// This key is used for storing regrets and strategies.
    fn key(&self) -> String;
}

/// Trait for game states.
///
/// A game state contains all information about the current state of the game,
/// including private information that players may not see.
pub trait GameState: Clone + Debug + Send + Sync {}

/// The main Game trait that defines the interface for any game.
///
/// # Type Parameters
/// - `State`: The game state type
/// - `Action`: The action type
/// - `InfoState`: The information state type
///
/// Transitions are pure: `apply_action` and the chance methods return new
/// states and leave their input untouched, so the solver can branch from the
/// same parent as many times as it likes.
pub trait Game: Clone + Send + Sync {
    /// The type representing a complete game state.
    type State: GameState;

    /// The type representing an action a player can take.
    type Action: Action;

    /// The type representing what a player knows at a decision point.
    type InfoState: InfoState;

    /// Create the initial game state.
    ///
    /// This is called at the start of each traversal to get a fresh game.
    fn initial_state(&self) -> Self::State;

    /// Check if the given state is terminal (game over).
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Get the utility for a player at a terminal state.
    ///
    /// # Errors
    /// `GameError::NotTerminal` if the hand is still running, or
    /// `GameError::InvalidHand` if showdown evaluation fails.
    fn utility(&self, state: &Self::State, player: usize) -> Result<f64, GameError>;

    /// Get the index of the player who should act at the current state.
    ///
    /// # Returns
    /// - `Some(player_index)` if a player should act
    /// - `None` if the state is terminal or a chance node
    fn current_player(&self, state: &Self::State) -> Option<usize>;

    /// Get the total number of players in the game.
    fn num_players(&self) -> usize;

    /// Get the ordered list of legal actions at the current state.
    ///
    /// Empty for terminal and chance states.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Apply an action to a state and return the resulting new state.
    ///
    /// # Errors
    /// `GameError::IllegalAction` if `action` is not in `legal_actions(state)`.
    fn apply_action(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Result<Self::State, GameError>;

    /// Get the information state for the current player.
    fn info_state(&self, state: &Self::State) -> Self::InfoState;

    /// Check if the current state is a chance node.
    fn is_chance(&self, _state: &Self::State) -> bool {
        false
    }

    /// Sample one outcome from a chance node.
    ///
    /// Games without chance nodes can rely on the default, which returns the
    /// state unchanged.
    fn sample_chance<R: Rng>(
        &self,
        state: &Self::State,
        _rng: &mut R,
    ) -> Result<Self::State, GameError> {
        Ok(state.clone())
    }

    /// Enumerate every outcome of a chance node with its probability.
    ///
    /// Used by exact evaluation. Probabilities must sum to 1.
    fn chance_outcomes(&self, state: &Self::State) -> Result<Vec<(Self::State, f64)>, GameError> {
        Ok(vec![(state.clone(), 1.0)])
    }

    /// Get a human-readable name for an action.
    fn action_name(&self, action: &Self::Action) -> String {
        action.code()
    }

    /// Get a human-readable description of a state.
    fn state_description(&self, state: &Self::State) -> String {
        format!("{:?}", state)
    }
}

/// Macro to simplify implementing the GameState trait.
#[macro_export]
macro_rules! impl_game_state {
    ($type:ty) => {
        impl $crate::cfr::game::GameState for $type {}
    };
}
