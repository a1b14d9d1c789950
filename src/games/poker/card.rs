//! Card representation for poker.
//!
//! - `Card`: A single playing card with rank and suit
//! - `Deck`: The cards still undealt, with per-variant constructors

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cfr::error::GameError;

/// Rank of a card (0-12: 2-A).
pub const RANK_2: u8 = 0;
/// Ten.
pub const RANK_T: u8 = 8;
/// Jack, the lowest rank in Kuhn and Leduc decks.
pub const RANK_J: u8 = 9;
/// Queen.
pub const RANK_Q: u8 = 10;
/// King.
pub const RANK_K: u8 = 11;
/// Ace.
pub const RANK_A: u8 = 12;

/// Suit of a card (0-3).
pub const SUIT_CLUBS: u8 = 0;
/// Diamonds.
pub const SUIT_DIAMONDS: u8 = 1;
/// Hearts.
pub const SUIT_HEARTS: u8 = 2;
/// Spades.
pub const SUIT_SPADES: u8 = 3;

/// Rank characters for display.
const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Suit characters for display.
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// A single playing card.
///
/// Orders by rank, then suit.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    /// Card index 0-51: rank * 4 + suit
    id: u8,
}

impl Card {
    /// Create a new card from rank (0-12) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13, "rank must be 0-12");
        debug_assert!(suit < 4, "suit must be 0-3");
        Self { id: rank * 4 + suit }
    }

    /// Get the card's ID (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Get the card's rank (0-12: 2-A).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.id / 4
    }

    /// Get the card's suit (0-3).
    #[inline]
    pub fn suit(&self) -> u8 {
        self.id % 4
    }

    /// Get rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS[self.rank() as usize]
    }

    /// Get suit character for display.
    pub fn suit_char(&self) -> char {
        SUIT_CHARS[self.suit() as usize]
    }
}

impl FromStr for Card {
    type Err = GameError;

    /// Parse a card from a string like "As", "Kh", "2c".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidCard(s.to_string());
        let mut chars = s.chars();
        let (Some(r), Some(u), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let rank = RANK_CHARS
            .iter()
            .position(|&c| c == r.to_ascii_uppercase())
            .ok_or_else(invalid)?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == u.to_ascii_lowercase())
            .ok_or_else(invalid)?;

        Ok(Self::new(rank as u8, suit as u8))
    }
}

/// Parse a run of cards like "As3h" or "Qs Jc 7d". Whitespace is ignored.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, GameError> {
    let compact: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 {
        return Err(GameError::InvalidCard(s.to_string()));
    }
    compact
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>().parse())
        .collect()
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// The undealt cards.
///
/// Dealing takes from the end, so a deck built in a known order deals in the
/// reverse of that order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck from an explicit list of cards.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Kuhn deck: `num_players + 1` ranks from the Jack up, one suit.
    pub fn kuhn(num_players: usize) -> Self {
        Self::from_ranks(num_players + 1, &[SUIT_SPADES])
    }

    /// Leduc deck: `num_players + 1` ranks from the Jack up in spades and hearts.
    pub fn leduc(num_players: usize) -> Self {
        Self::from_ranks(num_players + 1, &[SUIT_SPADES, SUIT_HEARTS])
    }

    fn from_ranks(num_ranks: usize, suits: &[u8]) -> Self {
        let cards = (RANK_J..RANK_J + num_ranks as u8)
            .flat_map(|rank| suits.iter().map(move |&suit| Card::new(rank, suit)))
            .collect();
        Self { cards }
    }

    /// A full 52-card deck.
    pub fn standard() -> Self {
        let cards = (0..13u8)
            .flat_map(|rank| (0..4u8).map(move |suit| Card::new(rank, suit)))
            .collect();
        Self { cards }
    }

    /// A full deck without the given dead cards.
    pub fn without(dead_cards: &[Card]) -> Self {
        let mut deck = Self::standard();
        deck.cards.retain(|c| !dead_cards.contains(c));
        deck
    }

    /// Shuffle the remaining cards.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deal one card.
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Take a specific card out of the deck. False if it was not there.
    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(i) => {
                self.cards.remove(i);
                true
            }
            None => false,
        }
    }

    /// Number of cards left.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// True once every card is dealt.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The cards left, in deal order reversed.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({} cards)", self.cards.len())
    }
}
