//! Poker hand evaluation.
//!
//! Kuhn hands are one card, Leduc hands are one hole card plus one board
//! card, and Hold'em hands are the best five of two hole cards plus five
//! board cards. All three produce a [`HandRank`], so showdown code compares
//! hands the same way whatever the variant.

use std::cmp::Ordering;

use crate::cfr::error::GameError;
use crate::games::poker::card::{Card, RANK_A};

/// Hand rank categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    /// No pair.
    HighCard = 0,
    /// One pair.
    OnePair = 1,
    /// Two pair.
    TwoPair = 2,
    /// Trips.
    ThreeOfAKind = 3,
    /// Five consecutive ranks.
    Straight = 4,
    /// Five of one suit.
    Flush = 5,
    /// Trips plus a pair.
    FullHouse = 6,
    /// Quads.
    FourOfAKind = 7,
    /// Straight in one suit.
    StraightFlush = 8,
    /// Ace-high straight flush.
    RoyalFlush = 9,
}

impl HandCategory {
    /// Get the category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            8 => HandCategory::StraightFlush,
            9 => HandCategory::RoyalFlush,
            _ => HandCategory::HighCard,
        }
    }
}

/// A hand rank that can be compared.
/// Higher values are better hands.
/// Format: category (4 bits) | kicker1 (4 bits) | kicker2 (4 bits) | ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandRank(u32);

impl HandRank {
    fn new(category: HandCategory, kickers: &[u8]) -> Self {
        let mut value = (category as u32) << 20;
        for (i, &k) in kickers.iter().take(5).enumerate() {
            value |= (k as u32) << (16 - i * 4);
        }
        Self(value)
    }

    /// Get the raw rank value for comparison.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Get the hand category.
    pub fn category(&self) -> HandCategory {
        HandCategory::from_bits(self.0 >> 20)
    }
}

impl PartialOrd for HandRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

fn describe(cards: &[Card]) -> String {
    format!(
        "{} cards [{}]",
        cards.len(),
        cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
    )
}

/// Rank a Kuhn hand: exactly one card, higher rank wins.
pub fn evaluate_kuhn(hole: &[Card]) -> Result<HandRank, GameError> {
    match hole {
        [card] => Ok(HandRank::new(HandCategory::HighCard, &[card.rank()])),
        _ => Err(GameError::InvalidHand {
            expected: "1 hole card",
            found: describe(hole),
        }),
    }
}

/// Rank a Leduc hand: one hole card and one board card.
///
/// Pairing the board beats any unpaired hand; otherwise the hole card rank
/// decides. Suits never matter.
pub fn evaluate_leduc(hole: &[Card], board: &[Card]) -> Result<HandRank, GameError> {
    match (hole, board) {
        ([h], [b]) if h.rank() == b.rank() => Ok(HandRank::new(HandCategory::OnePair, &[h.rank()])),
        ([h], [_]) => Ok(HandRank::new(HandCategory::HighCard, &[h.rank()])),
        _ => Err(GameError::InvalidHand {
            expected: "1 hole card and 1 board card",
            found: format!("{} and {}", describe(hole), describe(board)),
        }),
    }
}

/// Rank a Hold'em hand: two hole cards and a five-card board, best five of
/// the seven.
pub fn evaluate_holdem(hole: &[Card], board: &[Card]) -> Result<HandRank, GameError> {
    if hole.len() != 2 || board.len() != 5 {
        return Err(GameError::InvalidHand {
            expected: "2 hole cards and 5 board cards",
            found: format!("{} and {}", describe(hole), describe(board)),
        });
    }

    let cards: Vec<Card> = hole.iter().chain(board).copied().collect();
    let mut best = HandRank(0);

    // All 21 ways to drop two of the seven
    for skip_a in 0..7 {
        for skip_b in (skip_a + 1)..7 {
            let mut hand = [cards[0]; 5];
            let mut n = 0;
            for (i, &card) in cards.iter().enumerate() {
                if i != skip_a && i != skip_b {
                    hand[n] = card;
                    n += 1;
                }
            }
            best = best.max(evaluate_5(&hand));
        }
    }

    Ok(best)
}

/// Evaluate exactly five cards.
fn evaluate_5(cards: &[Card; 5]) -> HandRank {
    let mut rank_counts = [0u8; 13];
    let mut suit_counts = [0u8; 4];
    let mut rank_bits = 0u16;

    for card in cards {
        rank_counts[card.rank() as usize] += 1;
        suit_counts[card.suit() as usize] += 1;
        rank_bits |= 1 << card.rank();
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = find_straight(rank_bits);

    if let (true, Some(high)) = (is_flush, straight_high) {
        let category = if high == RANK_A {
            HandCategory::RoyalFlush
        } else {
            HandCategory::StraightFlush
        };
        return HandRank::new(category, &[high]);
    }

    let mut quads = Vec::new();
    let mut trips = Vec::new();
    let mut pairs = Vec::new();
    let mut singles = Vec::new();

    for rank in (0..13u8).rev() {
        match rank_counts[rank as usize] {
            4 => quads.push(rank),
            3 => trips.push(rank),
            2 => pairs.push(rank),
            1 => singles.push(rank),
            _ => {}
        }
    }

    if let Some(&quad) = quads.first() {
        let kicker = pairs.first().or(singles.first()).copied().unwrap_or(0);
        return HandRank::new(HandCategory::FourOfAKind, &[quad, kicker]);
    }

    if let (Some(&trip), Some(&pair)) = (trips.first(), pairs.first()) {
        return HandRank::new(HandCategory::FullHouse, &[trip, pair]);
    }

    if is_flush {
        // singles are already in descending rank order
        return HandRank::new(HandCategory::Flush, &singles);
    }

    if let Some(high) = straight_high {
        return HandRank::new(HandCategory::Straight, &[high]);
    }

    if let Some(&trip) = trips.first() {
        let mut kickers = vec![trip];
        kickers.extend(singles.iter().take(2));
        return HandRank::new(HandCategory::ThreeOfAKind, &kickers);
    }

    if pairs.len() >= 2 {
        let kicker = singles.first().copied().unwrap_or(0);
        return HandRank::new(HandCategory::TwoPair, &[pairs[0], pairs[1], kicker]);
    }

    if let Some(&pair) = pairs.first() {
        let mut kickers = vec![pair];
        kickers.extend(singles.iter().take(3));
        return HandRank::new(HandCategory::OnePair, &kickers);
    }

    HandRank::new(HandCategory::HighCard, &singles)
}

/// Highest card of a straight in the rank bitmask, if any.
fn find_straight(rank_bits: u16) -> Option<u8> {
    for high in (4..13u8).rev() {
        let mask = 0b11111u16 << (high - 4);
        if rank_bits & mask == mask {
            return Some(high);
        }
    }

    // Wheel: A-2-3-4-5 plays as five-high
    let wheel = 0b1_0000_0000_1111u16;
    if rank_bits & wheel == wheel {
        return Some(3);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::poker::card::parse_cards;

    fn holdem(hole: &str, board: &str) -> HandRank {
        evaluate_holdem(&parse_cards(hole).unwrap(), &parse_cards(board).unwrap()).unwrap()
    }

    #[test]
    fn test_kuhn_higher_card_wins() {
        let jack = evaluate_kuhn(&parse_cards("Js").unwrap()).unwrap();
        let king = evaluate_kuhn(&parse_cards("Ks").unwrap()).unwrap();
        assert!(king > jack);
        assert!(evaluate_kuhn(&parse_cards("JsQs").unwrap()).is_err());
        assert!(evaluate_kuhn(&[]).is_err());
    }

    #[test]
    fn test_leduc_pair_beats_high_card() {
        let board = parse_cards("Jh").unwrap();
        let pair = evaluate_leduc(&parse_cards("Js").unwrap(), &board).unwrap();
        let king = evaluate_leduc(&parse_cards("Ks").unwrap(), &board).unwrap();
        let queen = evaluate_leduc(&parse_cards("Qh").unwrap(), &board).unwrap();

        assert_eq!(pair.category(), HandCategory::OnePair);
        assert!(pair > king);
        assert!(king > queen);
    }

    #[test]
    fn test_leduc_suits_tie() {
        let board = parse_cards("Jh").unwrap();
        let ks = evaluate_leduc(&parse_cards("Ks").unwrap(), &board).unwrap();
        let kh = evaluate_leduc(&parse_cards("Kh").unwrap(), &board).unwrap();
        assert_eq!(ks, kh);
    }

    #[test]
    fn test_leduc_wrong_cardinality() {
        let result = evaluate_leduc(&parse_cards("Ks").unwrap(), &[]);
        assert!(matches!(result, Err(GameError::InvalidHand { .. })));
    }

    #[test]
    fn test_royal_flush() {
        let rank = holdem("TsAs", "JsQsKs2h4d");
        assert_eq!(rank.category(), HandCategory::RoyalFlush);
        assert_eq!(rank.category().name(), "Royal Flush");
    }

    #[test]
    fn test_straight_flush_and_wheel() {
        assert_eq!(holdem("9s8s", "7s6s5s2hKd").category(), HandCategory::StraightFlush);
        assert_eq!(holdem("As2d", "3h4c5s9dKh").category(), HandCategory::Straight);
        assert!(holdem("6s2d", "3h4c5s9dKh") > holdem("As2d", "3h4c5s9dKh"));
    }

    #[test]
    fn test_two_pair() {
        let rank = holdem("7s7d", "5h5s2dKh9s");
        assert_eq!(rank.category(), HandCategory::TwoPair);
    }

    #[test]
    fn test_four_of_a_kind_kicker() {
        let nine = holdem("AsAh", "AdAc9s2h3d");
        let king = holdem("AsAh", "AdAcKs2h3d");
        assert_eq!(nine.category(), HandCategory::FourOfAKind);
        assert!(king > nine);
    }

    #[test]
    fn test_full_house_flush_trips() {
        assert_eq!(holdem("AsAd", "AhKcKd2s3c").category(), HandCategory::FullHouse);
        assert_eq!(holdem("As9s", "Ks7s2s3d4h").category(), HandCategory::Flush);
        assert_eq!(holdem("QsQd", "Qh7c2d3s9h").category(), HandCategory::ThreeOfAKind);
    }

    #[test]
    fn test_high_card() {
        let rank = holdem("As9d", "Kh7c2d3s5h");
        assert_eq!(rank.category(), HandCategory::HighCard);
        assert!(holdem("AsTd", "Kh7c2d3s5h") > rank);
    }

    #[test]
    fn test_holdem_wrong_cardinality() {
        let hole = parse_cards("AsAh").unwrap();
        let board = parse_cards("AdAc9s").unwrap();
        assert!(matches!(
            evaluate_holdem(&hole, &board),
            Err(GameError::InvalidHand { .. })
        ));
    }
}
