//! CFR (Counterfactual Regret Minimization) Solver Module.
//!
//! This module provides a generic Monte Carlo CFR trainer and an exact
//! exploitability evaluator for extensive-form games.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium by:
//! 1. Computing counterfactual regret for each action at each decision point
//! 2. Updating strategies to minimize regret over time
//! 3. Averaging strategies across iterations to converge to equilibrium
//!
//! # Supported Variants
//!
//! - **MCCFR**: Samples chance and opponent actions, expands the traverser's
//! - **CFR+**: Floors negative regrets to zero (opt-in)
//! - **Linear CFR**: Weights later iterations more heavily (opt-in)
//!
//! # Usage
//!
//! 1. Implement the `Game` trait for your game
//! 2. Create a `CFRSolver` with your game and configuration
//! 3. Call `train()` to run iterations
//! 4. Extract strategies with `strategy_table()` and score them with
//!    `exploitability()`
//!
//! # Example
//!
//! ```
//! use mccfr_solver::cfr::{exploitability, CFRConfig, CFRSolver};
//! use mccfr_solver::games::poker::{GameConfig, PokerGame};
//!
//! let game = PokerGame::new(GameConfig::kuhn(2)).unwrap();
//! let mut solver = CFRSolver::new(game, CFRConfig::default().with_seed(3)).unwrap();
//! let stats = solver.train(2_000).unwrap();
//! assert_eq!(stats.info_sets, 12);
//!
//! let table = solver.strategy_table();
//! let gap = exploitability(solver.game(), &table).unwrap();
//! assert!(gap >= 0.0);
//! ```
//!
//! # Theory
//!
//! **Regret**: The difference between the value of an action and the value of the current strategy.
//! ```text
//! Regret(a) = Value(a) - Value(current_strategy)
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//!
//! **Convergence**: Average regret decreases as O(1/sqrt(T)), and the average strategy
//! converges to Nash equilibrium in two-player zero-sum games.
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Lanctot, M., et al. "Monte Carlo Sampling for Regret Minimization in Extensive Games" (2009)
//! - Tammelin, O. "Solving Large Imperfect Information Games Using CFR+" (2014)

pub mod config;
pub mod error;
pub mod exploitability;
pub mod game;
pub mod solver;
pub mod storage;
pub mod strategy;

// Re-export main types for convenient access
pub use config::{CFRConfig, CFRStats, ExploitabilityPoint};
pub use error::{ConfigError, GameError, SolverError};
pub use exploitability::{best_response_value, exploitability, strategy_values};
pub use game::{Action, Game, GameState, InfoState};
pub use solver::CFRSolver;
pub use storage::{Node, RegretStorage};
pub use strategy::{InfoSetStrategy, StrategyTable};
