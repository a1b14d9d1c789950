//! Betting actions.

use std::fmt;

use crate::cfr::game::Action;

/// An action in a limit betting round.
///
/// Sizes are fixed by the round, so an action carries no amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PokerAction {
    /// Give up the hand.
    Fold,
    /// Pass when nothing is owed.
    Check,
    /// Match the highest contribution.
    Call,
    /// Open the betting in a round with no wager yet.
    Bet,
    /// Match the highest contribution and add one bet size.
    Raise,
}

impl PokerAction {
    /// One-character history code.
    pub fn as_char(&self) -> char {
        match self {
            PokerAction::Fold => 'f',
            PokerAction::Check => 'k',
            PokerAction::Call => 'c',
            PokerAction::Bet => 'b',
            PokerAction::Raise => 'r',
        }
    }

    /// True for actions that put a new wager in.
    pub fn is_aggressive(&self) -> bool {
        matches!(self, PokerAction::Bet | PokerAction::Raise)
    }
}

impl Action for PokerAction {
    fn code(&self) -> String {
        self.as_char().to_string()
    }
}

impl fmt::Display for PokerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PokerAction::Fold => "Fold",
            PokerAction::Check => "Check",
            PokerAction::Call => "Call",
            PokerAction::Bet => "Bet",
            PokerAction::Raise => "Raise",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            PokerAction::Fold,
            PokerAction::Check,
            PokerAction::Call,
            PokerAction::Bet,
            PokerAction::Raise,
        ];
        let codes: String = all.iter().map(|a| a.as_char()).collect();
        assert_eq!(codes, "fkcbr");
        assert_eq!(PokerAction::Call.code(), "c");
        assert_eq!(PokerAction::Raise.to_string(), "Raise");
    }

    #[test]
    fn test_aggression() {
        assert!(PokerAction::Bet.is_aggressive());
        assert!(PokerAction::Raise.is_aggressive());
        assert!(!PokerAction::Call.is_aggressive());
    }
}
