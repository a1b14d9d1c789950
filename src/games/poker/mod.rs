//! Kuhn and Leduc poker.
//!
//! Both variants share one state type tagged with a [`Variant`]; the rules
//! branch on the tag only where the games differ (deck, rounds, showdown).
//!
//! ## Modules
//!
//! - `card`: Card and deck representations
//! - `hand_eval`: Showdown ranking for Kuhn, Leduc and Hold'em hands
//! - `config`: Betting parameters and validation
//! - `action`: Betting actions
//! - `state`: Complete game state and the acting seat's information state
//! - `game`: The rules, behind the `Game` trait

pub mod action;
pub mod card;
pub mod config;
pub mod game;
pub mod hand_eval;
pub mod state;

pub use action::PokerAction;
pub use card::{parse_cards, Card, Deck};
pub use config::{GameConfig, Variant};
pub use game::PokerGame;
pub use hand_eval::{evaluate_holdem, evaluate_kuhn, evaluate_leduc, HandCategory, HandRank};
pub use state::{Phase, PokerInfoState, PokerState};
