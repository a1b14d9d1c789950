//! Game implementations for the CFR solver.
//!
//! ## Available Games
//!
//! - [`poker`]: Kuhn and Leduc poker for two or three players
//!
//! ## Adding New Games
//!
//! 1. Create a new module under `src/games/`
//! 2. Define state, action, and info state types
//! 3. Implement the `Game` trait
//! 4. Add tests that verify expected behavior

pub mod poker;
