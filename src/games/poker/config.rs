//! Betting parameters for a poker variant.
//!
//! A [`GameConfig`] fixes everything about a hand except the cards: how many
//! seats, what each seat puts in before any action, how big a wager is in
//! each round and how many wagers a round allows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cfr::error::ConfigError;

/// The closed set of supported poker variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// One card each, one betting round.
    Kuhn,
    /// One card each, then a shared board card and a second round.
    Leduc,
}

impl Variant {
    /// Number of betting rounds.
    pub fn num_rounds(&self) -> usize {
        match self {
            Variant::Kuhn => 1,
            Variant::Leduc => 2,
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Kuhn => "kuhn",
            Variant::Leduc => "leduc",
        }
    }

    /// Largest table the variant's deck can deal to.
    pub fn max_players(&self) -> usize {
        3
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kuhn" => Ok(Variant::Kuhn),
            "leduc" => Ok(Variant::Leduc),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

/// Configuration for a poker game.
///
/// # Example
/// ```
/// use mccfr_solver::games::poker::GameConfig;
///
/// let config = GameConfig::leduc(3).with_stack(320).with_blinds(10, 20);
/// assert_eq!(config.bet_sizes, vec![20, 40]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Which rules to play.
    pub variant: Variant,

    /// Number of seats.
    pub num_players: usize,

    /// Chips each seat starts with.
    pub starting_stack: u32,

    /// Forced contribution from every seat before the deal.
    pub ante: u32,

    /// Forced contribution from seat 0.
    pub small_blind: u32,

    /// Forced contribution from seat 1. Counts as the opening wager of the
    /// first round.
    pub big_blind: u32,

    /// Size of a bet or raise, one entry per betting round.
    pub bet_sizes: Vec<u32>,

    /// Wagers allowed per round, not counting the big blind.
    pub max_raises: u32,
}

impl GameConfig {
    /// Kuhn poker: ante 1, bet 1, a single wager per hand.
    pub fn kuhn(num_players: usize) -> Self {
        Self {
            variant: Variant::Kuhn,
            num_players,
            starting_stack: 100,
            ante: 1,
            small_blind: 0,
            big_blind: 0,
            bet_sizes: vec![1],
            max_raises: 1,
        }
    }

    /// Leduc poker: ante 1, bets of 2 then 4, two wagers per round.
    pub fn leduc(num_players: usize) -> Self {
        Self {
            variant: Variant::Leduc,
            num_players,
            starting_stack: 100,
            ante: 1,
            small_blind: 0,
            big_blind: 0,
            bet_sizes: vec![2, 4],
            max_raises: 2,
        }
    }

    /// Defaults for a variant.
    pub fn for_variant(variant: Variant, num_players: usize) -> Self {
        match variant {
            Variant::Kuhn => Self::kuhn(num_players),
            Variant::Leduc => Self::leduc(num_players),
        }
    }

    /// Builder method: set the starting stack.
    pub fn with_stack(mut self, stack: u32) -> Self {
        self.starting_stack = stack;
        self
    }

    /// Builder method: play with blinds instead of an ante.
    ///
    /// Bets become one big blind in the first round and two in every later
    /// round.
    pub fn with_blinds(mut self, small_blind: u32, big_blind: u32) -> Self {
        self.ante = 0;
        self.small_blind = small_blind;
        self.big_blind = big_blind;
        self.bet_sizes = (0..self.variant.num_rounds())
            .map(|round| if round == 0 { big_blind } else { 2 * big_blind })
            .collect();
        self
    }

    /// Builder method: set the per-round wager limit.
    pub fn with_max_raises(mut self, max_raises: u32) -> Self {
        self.max_raises = max_raises;
        self
    }

    /// Chips `seat` commits before any action, ante included.
    pub fn forced_contribution(&self, seat: usize) -> u32 {
        let blind = match seat {
            0 => self.small_blind,
            1 => self.big_blind,
            _ => 0,
        };
        self.ante + blind
    }

    /// Most a single seat can ever put in the pot.
    pub fn max_commitment(&self) -> u32 {
        let wagers: u32 = self.bet_sizes.iter().map(|&size| self.max_raises * size).sum();
        self.ante + self.big_blind + wagers
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = self.variant.max_players();
        if self.num_players < 2 || self.num_players > max {
            return Err(ConfigError::UnsupportedPlayers {
                variant: self.variant.name(),
                players: self.num_players,
                max,
            });
        }

        let rounds = self.variant.num_rounds();
        if self.bet_sizes.len() != rounds || self.bet_sizes.contains(&0) {
            return Err(ConfigError::BetSizes {
                rounds,
                sizes: self.bet_sizes.clone(),
            });
        }

        if self.small_blind > self.big_blind {
            return Err(ConfigError::InvalidBlinds {
                small: self.small_blind,
                big: self.big_blind,
            });
        }

        let required = self.max_commitment();
        if self.starting_stack < required {
            return Err(ConfigError::StackTooShallow {
                stack: self.starting_stack,
                required,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for n in 2..=3 {
            assert!(GameConfig::kuhn(n).validate().is_ok());
            assert!(GameConfig::leduc(n).validate().is_ok());
        }
    }

    #[test]
    fn test_player_count_limits() {
        assert_eq!(
            GameConfig::kuhn(4).validate(),
            Err(ConfigError::UnsupportedPlayers {
                variant: "kuhn",
                players: 4,
                max: 3
            })
        );
        assert!(GameConfig::leduc(1).validate().is_err());
    }

    #[test]
    fn test_blinds_set_bet_sizes() {
        let config = GameConfig::leduc(3).with_blinds(10, 20);
        assert_eq!(config.ante, 0);
        assert_eq!(config.bet_sizes, vec![20, 40]);
        assert_eq!(config.forced_contribution(0), 10);
        assert_eq!(config.forced_contribution(1), 20);
        assert_eq!(config.forced_contribution(2), 0);
        // big blind plus two raises of 20, then two bets of 40
        assert_eq!(config.max_commitment(), 140);
    }

    #[test]
    fn test_shallow_stack_rejected() {
        let config = GameConfig::leduc(2).with_stack(12);
        assert_eq!(
            config.validate(),
            Err(ConfigError::StackTooShallow {
                stack: 12,
                required: 13
            })
        );
        assert!(GameConfig::leduc(2).with_stack(13).validate().is_ok());
    }

    #[test]
    fn test_bad_bet_sizes_and_blinds() {
        let mut config = GameConfig::leduc(2);
        config.bet_sizes = vec![2];
        assert!(matches!(config.validate(), Err(ConfigError::BetSizes { .. })));

        let config = GameConfig::leduc(2).with_stack(500).with_blinds(30, 20);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBlinds { small: 30, big: 20 })
        );
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("Leduc".parse::<Variant>().unwrap(), Variant::Leduc);
        assert_eq!("kuhn".parse::<Variant>().unwrap(), Variant::Kuhn);
        assert!(matches!(
            "holdem".parse::<Variant>(),
            Err(ConfigError::UnknownVariant(_))
        ));
        assert_eq!(Variant::Leduc.to_string(), "leduc");
    }
}
