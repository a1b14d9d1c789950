//! Kuhn and Leduc rules behind the `Game` trait.
//!
//! ## Hand flow
//!
//! ```text
//! Deal (chance) ── hole cards ──▶ Betting round 1
//!                                   │
//!        Kuhn ──────────────────────┤
//!                                   │ Leduc
//!                                   ▼
//!                         Board (chance) ── one card ──▶ Betting round 2
//!                                                            │
//!                     Showdown ◀─────────────────────────────┘
//! ```
//!
//! Any fold that leaves a single seat ends the hand as `Uncontested`.

use rand::Rng;

use crate::cfr::error::{ConfigError, GameError};
use crate::cfr::game::{Game, InfoState};
use crate::games::poker::action::PokerAction;
use crate::games::poker::card::{Card, Deck};
use crate::games::poker::config::{GameConfig, Variant};
use crate::games::poker::hand_eval::{evaluate_kuhn, evaluate_leduc, HandRank};
use crate::games::poker::state::{Phase, PokerInfoState, PokerState};

/// A Kuhn or Leduc table with fixed betting parameters.
#[derive(Debug, Clone)]
pub struct PokerGame {
    config: GameConfig,
}

impl PokerGame {
    /// Create a game, validating its configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The betting parameters.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh deck for this variant and table size.
    pub fn deck(&self) -> Deck {
        match self.config.variant {
            Variant::Kuhn => Deck::kuhn(self.config.num_players),
            Variant::Leduc => Deck::leduc(self.config.num_players),
        }
    }

    /// Deal a hand from an explicitly ordered deck instead of at random.
    ///
    /// Seat 0 gets the first card dealt. The rest of the deck stays with the
    /// state, so [`PokerGame::deal_next`] can take the Leduc board from it.
    pub fn deal_from(&self, deck: Deck) -> Result<PokerState, GameError> {
        let mut state = self.initial_state();
        state.deck = deck;
        self.deal_next(&state)
    }

    /// Resolve a chance node with the next cards off the state's own deck.
    pub fn deal_next(&self, state: &PokerState) -> Result<PokerState, GameError> {
        let mut next = state.clone();
        match state.phase {
            Phase::Deal => {
                let mut hole = Vec::with_capacity(self.config.num_players);
                for _ in 0..self.config.num_players {
                    hole.push(next.deck.deal().ok_or(GameError::DeckExhausted)?);
                }
                next.hole = hole;
            }
            Phase::Board => {
                let card = next.deck.deal().ok_or(GameError::DeckExhausted)?;
                next.board.push(card);
            }
            _ => return Ok(next),
        }
        Ok(self.start_round(next))
    }

    fn first_to_act(&self, state: &PokerState) -> usize {
        if state.round == 0 && self.config.big_blind > 0 {
            // seat after the big blind
            2 % self.config.num_players
        } else {
            state.first_active()
        }
    }

    fn start_round(&self, mut state: PokerState) -> PokerState {
        state.phase = Phase::Betting;
        state.to_act = self.first_to_act(&state);
        state
    }

    /// Move past a finished round, or to the next seat.
    fn advance(&self, mut state: PokerState, actor: usize) -> PokerState {
        if state.num_active() == 1 {
            state.phase = Phase::Uncontested;
            return state;
        }

        if !state.is_round_complete() {
            state.to_act = state.next_active_after(actor);
            return state;
        }

        if state.round + 1 < self.config.variant.num_rounds() {
            state.round += 1;
            state.history.push(Vec::new());
            state.raises = 0;
            state.wager_open = false;
            state.acted = vec![false; state.num_players()];
            state.phase = Phase::Board;
        } else {
            state.phase = Phase::Showdown;
        }
        state
    }

    fn hand_rank(&self, state: &PokerState, seat: usize) -> Result<HandRank, GameError> {
        let hole = state.hole.get(seat..=seat).unwrap_or(&[]);
        match state.variant {
            Variant::Kuhn => evaluate_kuhn(hole),
            Variant::Leduc => evaluate_leduc(hole, &state.board),
        }
    }

    /// Chips won by each seat at a terminal state.
    fn winnings(&self, state: &PokerState) -> Result<Vec<f64>, GameError> {
        let pot = state.pot() as f64;
        let mut won = vec![0.0; state.num_players()];

        match state.phase {
            Phase::Uncontested => {
                won[state.first_active()] = pot;
            }
            Phase::Showdown => {
                let mut best: Option<HandRank> = None;
                let mut winners = Vec::new();
                for seat in state.active_seats() {
                    let rank = self.hand_rank(state, seat)?;
                    match best {
                        Some(b) if rank < b => {}
                        Some(b) if rank == b => winners.push(seat),
                        _ => {
                            best = Some(rank);
                            winners = vec![seat];
                        }
                    }
                }
                let share = pot / winners.len() as f64;
                for seat in winners {
                    won[seat] = share;
                }
            }
            _ => return Err(GameError::NotTerminal),
        }

        Ok(won)
    }

    fn illegal(&self, state: &PokerState, action: &PokerAction) -> GameError {
        GameError::IllegalAction {
            action: action.to_string(),
            key: self.info_state(state).key(),
        }
    }
}

impl Game for PokerGame {
    type State = PokerState;
    type Action = PokerAction;
    type InfoState = PokerInfoState;

    fn initial_state(&self) -> Self::State {
        let n = self.config.num_players;
        PokerState {
            variant: self.config.variant,
            phase: Phase::Deal,
            to_act: 0,
            round: 0,
            history: vec![Vec::new()],
            hole: Vec::new(),
            board: Vec::new(),
            contributions: (0..n).map(|seat| self.config.forced_contribution(seat)).collect(),
            folded: vec![false; n],
            acted: vec![false; n],
            raises: 0,
            wager_open: self.config.big_blind > 0,
            deck: self.deck(),
        }
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        matches!(state.phase, Phase::Showdown | Phase::Uncontested)
    }

    fn utility(&self, state: &Self::State, player: usize) -> Result<f64, GameError> {
        let won = self.winnings(state)?;
        Ok(won[player] - state.contributions[player] as f64)
    }

    fn current_player(&self, state: &Self::State) -> Option<usize> {
        match state.phase {
            Phase::Betting => Some(state.to_act),
            _ => None,
        }
    }

    fn num_players(&self) -> usize {
        self.config.num_players
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        if state.phase != Phase::Betting {
            return Vec::new();
        }

        let can_raise = state.raises < self.config.max_raises;

        if state.to_call(state.to_act) > 0 {
            let mut actions = vec![PokerAction::Fold, PokerAction::Call];
            if can_raise {
                actions.push(PokerAction::Raise);
            }
            actions
        } else if !can_raise {
            vec![PokerAction::Check]
        } else if state.wager_open {
            // big blind's option
            vec![PokerAction::Check, PokerAction::Raise]
        } else {
            vec![PokerAction::Check, PokerAction::Bet]
        }
    }

    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Result<Self::State, GameError> {
        if !self.legal_actions(state).contains(action) {
            return Err(self.illegal(state, action));
        }

        let mut next = state.clone();
        let actor = state.to_act;

        match action {
            PokerAction::Fold => {
                next.folded[actor] = true;
            }
            PokerAction::Check => {
                next.acted[actor] = true;
            }
            PokerAction::Call => {
                next.contributions[actor] = state.highest_contribution();
                next.acted[actor] = true;
            }
            PokerAction::Bet | PokerAction::Raise => {
                let size = self.config.bet_sizes[state.round];
                next.contributions[actor] = state.highest_contribution() + size;
                next.raises += 1;
                next.wager_open = true;
                next.acted = vec![false; state.num_players()];
                next.acted[actor] = true;
            }
        }

        if let Some(round) = next.history.last_mut() {
            round.push(*action);
        }

        Ok(self.advance(next, actor))
    }

    fn info_state(&self, state: &Self::State) -> Self::InfoState {
        PokerInfoState {
            variant: state.variant,
            hole: state.hole.get(state.to_act).copied(),
            board: state.board.clone(),
            history: state.history.clone(),
        }
    }

    fn is_chance(&self, state: &Self::State) -> bool {
        matches!(state.phase, Phase::Deal | Phase::Board)
    }

    fn sample_chance<R: Rng>(&self, state: &Self::State, rng: &mut R) -> Result<Self::State, GameError> {
        let mut next = state.clone();
        let cards_needed = match state.phase {
            Phase::Deal => self.config.num_players,
            Phase::Board => 1,
            _ => return Ok(next),
        };

        let mut dealt = Vec::with_capacity(cards_needed);
        for _ in 0..cards_needed {
            if next.deck.is_empty() {
                return Err(GameError::DeckExhausted);
            }
            let pick = next.deck.cards()[rng.gen_range(0..next.deck.remaining())];
            next.deck.remove(pick);
            dealt.push(pick);
        }

        match state.phase {
            Phase::Deal => next.hole = dealt,
            _ => next.board.extend(dealt),
        }
        Ok(self.start_round(next))
    }

    fn chance_outcomes(&self, state: &Self::State) -> Result<Vec<(Self::State, f64)>, GameError> {
        match state.phase {
            Phase::Deal => {
                let mut deals = Vec::new();
                let mut hole = Vec::with_capacity(self.config.num_players);
                collect_deals(state.deck.cards(), self.config.num_players, &mut hole, &mut deals);
                if deals.is_empty() {
                    return Err(GameError::DeckExhausted);
                }

                let prob = 1.0 / deals.len() as f64;
                Ok(deals
                    .into_iter()
                    .map(|hole| {
                        let mut next = state.clone();
                        for &card in &hole {
                            next.deck.remove(card);
                        }
                        next.hole = hole;
                        (self.start_round(next), prob)
                    })
                    .collect())
            }
            Phase::Board => {
                if state.deck.is_empty() {
                    return Err(GameError::DeckExhausted);
                }
                let prob = 1.0 / state.deck.remaining() as f64;
                Ok(state
                    .deck
                    .cards()
                    .iter()
                    .map(|&card| {
                        let mut next = state.clone();
                        next.deck.remove(card);
                        next.board.push(card);
                        (self.start_round(next), prob)
                    })
                    .collect())
            }
            _ => Ok(vec![(state.clone(), 1.0)]),
        }
    }

    fn action_name(&self, action: &Self::Action) -> String {
        action.to_string()
    }

    fn state_description(&self, state: &Self::State) -> String {
        state.to_string()
    }
}

/// Every ordered assignment of distinct cards to `seats` seats.
fn collect_deals(
    cards: &[Card],
    seats: usize,
    hole: &mut Vec<Card>,
    deals: &mut Vec<Vec<Card>>,
) {
    if hole.len() == seats {
        deals.push(hole.clone());
        return;
    }
    for &card in cards {
        if hole.contains(&card) {
            continue;
        }
        hole.push(card);
        collect_deals(cards, seats, hole, deals);
        hole.pop();
    }
}
