//! Exact exploitability of a strategy table.
//!
//! Every chance outcome and every action is enumerated, so the result is the
//! true gap to equilibrium rather than a sampled estimate. This is only
//! tractable for small games like Kuhn and Leduc, which is what it is for.
//!
//! A best response has to respect information sets: the responder picks one
//! action per information set, the one maximizing
//! `sum over h in I of reach_others(h) * value(h, a)`. Because a player with
//! perfect recall always makes the same number of its own decisions before
//! reaching a given information set, the choices are solved one decision
//! depth at a time, deepest first.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::cfr::error::{GameError, SolverError};
use crate::cfr::game::{Game, InfoState};
use crate::cfr::strategy::StrategyTable;

/// Average gain of a best-responding seat over the table's own value.
///
/// `sum_i (best_response_i - self_play_i) / num_players`, never negative.
/// Zero exactly at a Nash equilibrium.
pub fn exploitability<G: Game>(game: &G, table: &StrategyTable) -> Result<f64, SolverError> {
    let num_players = game.num_players();
    let on_policy = strategy_values(game, table)?;

    let best: Vec<f64> = (0..num_players)
        .into_par_iter()
        .map(|player| best_response_value(game, table, player))
        .collect::<Result<_, _>>()?;

    let gap: f64 = best.iter().zip(&on_policy).map(|(br, v)| br - v).sum();
    Ok((gap / num_players as f64).max(0.0))
}

/// Expected utility of every seat when all of them play `table`.
pub fn strategy_values<G: Game>(game: &G, table: &StrategyTable) -> Result<Vec<f64>, GameError> {
    values_under_table(game, table, &game.initial_state())
}

fn values_under_table<G: Game>(
    game: &G,
    table: &StrategyTable,
    state: &G::State,
) -> Result<Vec<f64>, GameError> {
    let num_players = game.num_players();

    if game.is_terminal(state) {
        return (0..num_players).map(|p| game.utility(state, p)).collect();
    }

    let mut values = vec![0.0; num_players];

    if game.is_chance(state) {
        for (child, prob) in game.chance_outcomes(state)? {
            let child_values = values_under_table(game, table, &child)?;
            for (v, c) in values.iter_mut().zip(child_values) {
                *v += prob * c;
            }
        }
        return Ok(values);
    }

    let actions = game.legal_actions(state);
    let strategy = table.probabilities(&game.info_state(state).key(), actions.len());
    for (action, &prob) in actions.iter().zip(&strategy) {
        if prob == 0.0 {
            continue;
        }
        let child = game.apply_action(state, action)?;
        let child_values = values_under_table(game, table, &child)?;
        for (v, c) in values.iter_mut().zip(child_values) {
            *v += prob * c;
        }
    }
    Ok(values)
}

/// Value `player` earns by best-responding while every other seat plays
/// `table`.
pub fn best_response_value<G: Game>(
    game: &G,
    table: &StrategyTable,
    player: usize,
) -> Result<f64, GameError> {
    let mut solver = BestResponse {
        game,
        table,
        player,
        choices: FxHashMap::default(),
        action_values: FxHashMap::default(),
    };
    let root = game.initial_state();

    if let Some(max_depth) = solver.max_depth(&root, 0)? {
        for target in (0..=max_depth).rev() {
            solver.action_values.clear();
            solver.accumulate(&root, 0, 1.0, target)?;

            for (key, values) in solver.action_values.drain() {
                solver.choices.insert(key, argmax(&values));
            }
        }
    }

    solver.evaluate(&root)
}

/// Index of the largest value, first one on ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

struct BestResponse<'a, G: Game> {
    game: &'a G,
    table: &'a StrategyTable,
    player: usize,
    /// info key -> chosen action, for every depth already solved
    choices: FxHashMap<String, usize>,
    /// info key -> reach-weighted value per action at the depth being solved
    action_values: FxHashMap<String, Vec<f64>>,
}

impl<G: Game> BestResponse<'_, G> {
    /// Deepest responder decision depth in the tree, `None` if the responder
    /// never acts.
    fn max_depth(&self, state: &G::State, depth: usize) -> Result<Option<usize>, GameError> {
        if self.game.is_terminal(state) {
            return Ok(None);
        }

        let mut deepest = None;
        let children: Vec<(G::State, usize)> = if self.game.is_chance(state) {
            self.game
                .chance_outcomes(state)?
                .into_iter()
                .map(|(child, _)| (child, depth))
                .collect()
        } else {
            let own = self.game.current_player(state) == Some(self.player);
            if own {
                deepest = Some(depth);
            }
            let next = if own { depth + 1 } else { depth };
            self.game
                .legal_actions(state)
                .iter()
                .map(|a| Ok((self.game.apply_action(state, a)?, next)))
                .collect::<Result<_, GameError>>()?
        };

        for (child, child_depth) in children {
            if let Some(d) = self.max_depth(&child, child_depth)? {
                deepest = Some(deepest.map_or(d, |cur: usize| cur.max(d)));
            }
        }
        Ok(deepest)
    }

    /// Walk to responder decisions at `target` depth and add each action's
    /// reach-weighted value to `action_values`.
    fn accumulate(
        &mut self,
        state: &G::State,
        depth: usize,
        reach_others: f64,
        target: usize,
    ) -> Result<(), GameError> {
        if self.game.is_terminal(state) {
            return Ok(());
        }

        if self.game.is_chance(state) {
            for (child, prob) in self.game.chance_outcomes(state)? {
                self.accumulate(&child, depth, reach_others * prob, target)?;
            }
            return Ok(());
        }

        let actions = self.game.legal_actions(state);
        let key = self.game.info_state(state).key();

        if self.game.current_player(state) == Some(self.player) {
            if depth == target {
                let mut values = Vec::with_capacity(actions.len());
                for action in &actions {
                    let child = self.game.apply_action(state, action)?;
                    values.push(reach_others * self.evaluate(&child)?);
                }
                let entry = self
                    .action_values
                    .entry(key)
                    .or_insert_with(|| vec![0.0; actions.len()]);
                for (total, v) in entry.iter_mut().zip(values) {
                    *total += v;
                }
            } else {
                for action in &actions {
                    let child = self.game.apply_action(state, action)?;
                    self.accumulate(&child, depth + 1, reach_others, target)?;
                }
            }
            return Ok(());
        }

        let strategy = self.table.probabilities(&key, actions.len());
        for (action, &prob) in actions.iter().zip(&strategy) {
            if prob == 0.0 {
                continue;
            }
            let child = self.game.apply_action(state, action)?;
            self.accumulate(&child, depth, reach_others * prob, target)?;
        }
        Ok(())
    }

    /// Responder's value with its solved choices and everyone else on `table`.
    fn evaluate(&self, state: &G::State) -> Result<f64, GameError> {
        if self.game.is_terminal(state) {
            return self.game.utility(state, self.player);
        }

        if self.game.is_chance(state) {
            let mut value = 0.0;
            for (child, prob) in self.game.chance_outcomes(state)? {
                value += prob * self.evaluate(&child)?;
            }
            return Ok(value);
        }

        let actions = self.game.legal_actions(state);
        let key = self.game.info_state(state).key();

        if self.game.current_player(state) == Some(self.player) {
            let choice = self.choices.get(&key).copied().unwrap_or(0);
            let child = self.game.apply_action(state, &actions[choice])?;
            return self.evaluate(&child);
        }

        let strategy = self.table.probabilities(&key, actions.len());
        let mut value = 0.0;
        for (action, &prob) in actions.iter().zip(&strategy) {
            if prob == 0.0 {
                continue;
            }
            let child = self.game.apply_action(state, action)?;
            value += prob * self.evaluate(&child)?;
        }
        Ok(value)
    }
}
