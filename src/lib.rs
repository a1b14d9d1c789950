//! # MCCFR Solver
//!
//! Monte Carlo Counterfactual Regret Minimization for Kuhn and Leduc poker,
//! with exact exploitability scoring of the strategies it learns.
//!
//! ## Features
//!
//! - **Generic CFR Engine**: Works with any game implementing the `Game` trait
//! - **External Sampling**: Chance and opponents sampled, traverser expanded
//! - **Thread-Safe Storage**: Locked read-modify-write per information set
//! - **Exact Exploitability**: Full-tree best response, one seat per thread
//!
//! ## Quick Start
//!
//! ```
//! use mccfr_solver::{train, CFRConfig, GameConfig};
//!
//! let table = train(5_000, GameConfig::kuhn(2), CFRConfig::default().with_seed(42)).unwrap();
//! let jack = table.probabilities("J|", 2);
//! assert!((jack[0] + jack[1] - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: Core CFR algorithm, storage and evaluation
//! - [`games`]: Kuhn and Leduc poker
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      CFR Solver (Generic)                       │
//! │  - Regret accumulation    - Strategy computation                │
//! │  - MCCFR traversal        - Exploitability calculation          │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ implements Game trait
//!                               ▼
//!                    ┌─────────────────────┐
//!                    │     PokerGame       │
//!                    │  Kuhn  |  Leduc     │
//!                    └─────────────────────┘
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) solver module.
///
/// This is the core module containing the generic CFR algorithm.
pub mod cfr;

/// Game implementations module.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{
    exploitability, Action, CFRConfig, CFRSolver, CFRStats, ConfigError, Game, GameError,
    GameState, InfoState, SolverError, StrategyTable,
};
pub use games::poker::{GameConfig, PokerGame, Variant};

/// Train an average strategy for a poker variant.
///
/// Builds the game from `game`, runs `num_iterations` MCCFR iterations with
/// `solver`, and returns the average strategy of every information set
/// visited.
///
/// # Errors
/// Either configuration failing validation, or a rule violation during
/// traversal.
pub fn train(
    num_iterations: u64,
    game: GameConfig,
    solver: CFRConfig,
) -> Result<StrategyTable, SolverError> {
    let game = PokerGame::new(game)?;
    let mut solver = CFRSolver::new(game, solver)?;
    solver.train(num_iterations)?;
    Ok(solver.strategy_table())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_rejects_bad_config() {
        let result = train(10, GameConfig::kuhn(7), CFRConfig::default());
        assert!(matches!(result, Err(SolverError::Config(_))));

        let result = train(10, GameConfig::kuhn(2), CFRConfig::default().with_exploration(-1.0));
        assert!(matches!(result, Err(SolverError::Config(ConfigError::InvalidExploration(_)))));
    }

    #[test]
    fn test_train_leduc_produces_keys() {
        let table = train(200, GameConfig::leduc(2), CFRConfig::default().with_seed(1)).unwrap();
        assert!(!table.is_empty());
        assert!(table.iter().all(|(key, _)| key.matches('|').count() == 2));
    }
}
