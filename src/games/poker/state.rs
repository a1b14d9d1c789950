//! Poker game state and information state.

use std::fmt;

use crate::cfr::game::InfoState;
use crate::games::poker::action::PokerAction;
use crate::games::poker::card::{Card, Deck};
use crate::games::poker::config::Variant;
use crate::impl_game_state;

/// Where a hand is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for hole cards (chance).
    Deal,
    /// A seat is to act.
    Betting,
    /// Waiting for the board card between rounds (chance).
    Board,
    /// Betting finished with two or more seats left.
    Showdown,
    /// Everyone but one seat folded.
    Uncontested,
}

/// Complete state of a hand, hidden cards included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PokerState {
    /// Rules in play.
    pub variant: Variant,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Seat to act, meaningful only in `Phase::Betting`.
    pub to_act: usize,
    /// Betting round index, 0-based.
    pub round: usize,
    /// Actions taken, one list per round started so far.
    pub history: Vec<Vec<PokerAction>>,
    /// Hole cards per seat, empty until dealt.
    pub hole: Vec<Card>,
    /// Shared board cards.
    pub board: Vec<Card>,
    /// Chips each seat has put in the pot.
    pub contributions: Vec<u32>,
    /// Seats that have folded.
    pub folded: Vec<bool>,
    /// Seats that have acted since the last wager of this round.
    pub acted: Vec<bool>,
    /// Bets and raises made this round, not counting the big blind.
    pub raises: u32,
    /// True once the round has a wager to respond to (the big blind counts).
    pub wager_open: bool,
    /// Cards not yet dealt.
    pub deck: Deck,
}

impl_game_state!(PokerState);

fn format_history(history: &[Vec<PokerAction>]) -> String {
    history
        .iter()
        .map(|round| round.iter().map(|a| a.as_char()).collect::<String>())
        .collect::<Vec<_>>()
        .join("/")
}

impl PokerState {
    /// Number of seats.
    pub fn num_players(&self) -> usize {
        self.contributions.len()
    }

    /// Total chips in the pot.
    pub fn pot(&self) -> u32 {
        self.contributions.iter().sum()
    }

    /// Largest contribution at the table.
    pub fn highest_contribution(&self) -> u32 {
        self.contributions.iter().copied().max().unwrap_or(0)
    }

    /// Chips `seat` must add to call.
    pub fn to_call(&self, seat: usize) -> u32 {
        self.highest_contribution() - self.contributions[seat]
    }

    /// Seats that have not folded, in seat order.
    pub fn active_seats(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_players()).filter(move |&p| !self.folded[p])
    }

    /// Number of seats still in the hand.
    pub fn num_active(&self) -> usize {
        self.active_seats().count()
    }

    /// Every active seat has acted and matched the highest contribution.
    pub fn is_round_complete(&self) -> bool {
        let highest = self.highest_contribution();
        self.active_seats()
            .all(|p| self.acted[p] && self.contributions[p] == highest)
    }

    /// Next active seat after `seat`, wrapping around.
    pub fn next_active_after(&self, seat: usize) -> usize {
        let n = self.num_players();
        (1..=n)
            .map(|offset| (seat + offset) % n)
            .find(|&p| !self.folded[p])
            .unwrap_or(seat)
    }

    /// First active seat counting from seat 0.
    pub fn first_active(&self) -> usize {
        self.active_seats().next().unwrap_or(0)
    }

    /// Public history as text: rounds joined by `/`.
    pub fn history_string(&self) -> String {
        format_history(&self.history)
    }
}

impl fmt::Display for PokerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hole: Vec<String> = self.hole.iter().map(|c| c.to_string()).collect();
        let board: Vec<String> = self.board.iter().map(|c| c.to_string()).collect();
        write!(
            f,
            "{} {:?} hole:[{}] board:[{}] history:{} pot:{:?}",
            self.variant,
            self.phase,
            hole.join(" "),
            board.join(" "),
            self.history_string(),
            self.contributions
        )
    }
}

/// What the acting seat knows: its own card, the board and the public
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PokerInfoState {
    /// Rules in play, which fix the key format.
    pub variant: Variant,
    /// The acting seat's hole card, if dealt.
    pub hole: Option<Card>,
    /// Board cards.
    pub board: Vec<Card>,
    /// Public action history, one list per round.
    pub history: Vec<Vec<PokerAction>>,
}

impl InfoState for PokerInfoState {
    /// Kuhn: `"J|kb"`. Leduc: `"Ks|Jh|rc/k"`, with the board and round-two
    /// history absent until dealt.
    fn key(&self) -> String {
        match self.variant {
            Variant::Kuhn => {
                let rank = self.hole.map_or('?', |c| c.rank_char());
                format!("{}|{}", rank, format_history(&self.history))
            }
            Variant::Leduc => {
                let hole = self.hole.map_or_else(|| "?".to_string(), |c| c.to_string());
                let board: String = self.board.iter().map(|c| c.to_string()).collect();
                format!("{}|{}|{}", hole, board, format_history(&self.history))
            }
        }
    }
}

impl fmt::Display for PokerInfoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::poker::card::parse_cards;

    fn info(variant: Variant, hole: &str, board: &str, rounds: &[&[PokerAction]]) -> PokerInfoState {
        PokerInfoState {
            variant,
            hole: parse_cards(hole).unwrap().first().copied(),
            board: parse_cards(board).unwrap(),
            history: rounds.iter().map(|r| r.to_vec()).collect(),
        }
    }

    #[test]
    fn test_kuhn_key() {
        use crate::games::poker::action::PokerAction::*;
        assert_eq!(info(Variant::Kuhn, "Js", "", &[&[]]).key(), "J|");
        assert_eq!(info(Variant::Kuhn, "Qs", "", &[&[Check, Bet]]).key(), "Q|kb");
    }

    #[test]
    fn test_leduc_key() {
        use crate::games::poker::action::PokerAction::*;
        assert_eq!(info(Variant::Leduc, "Ks", "", &[&[Bet]]).key(), "Ks||b");
        assert_eq!(
            info(Variant::Leduc, "Ks", "Jh", &[&[Raise, Call], &[Check]]).key(),
            "Ks|Jh|rc/k"
        );
    }

    #[test]
    fn test_leduc_key_distinguishes_suits() {
        let spade = info(Variant::Leduc, "Qs", "", &[&[]]);
        let heart = info(Variant::Leduc, "Qh", "", &[&[]]);
        assert_ne!(spade.key(), heart.key());
    }
}
