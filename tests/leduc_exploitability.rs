//! Integration tests for Leduc Poker training and exact exploitability.

use mccfr_solver::cfr::{exploitability, CFRConfig, CFRSolver, StrategyTable};
use mccfr_solver::games::poker::{GameConfig, PokerGame};
use mccfr_solver::train;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn leduc_solver(config: GameConfig, seed: u64) -> CFRSolver<PokerGame> {
    let game = PokerGame::new(config).unwrap();
    CFRSolver::new(game, CFRConfig::default().with_seed(seed)).unwrap()
}

#[test]
fn leduc_exploitability_decreases() {
    let mut solver = leduc_solver(GameConfig::leduc(2), 42);
    solver.train_with_checkpoints(&[1_000, 10_000]).unwrap();

    let history = &solver.stats().exploitability_history;
    assert_eq!(history.len(), 2);
    assert!(
        history[1].exploitability < history[0].exploitability,
        "exploitability should fall: {:?}",
        history
    );
}

#[test]
fn trained_leduc_beats_uniform_play() {
    let game = PokerGame::new(GameConfig::leduc(2)).unwrap();
    let uniform = exploitability(&game, &StrategyTable::new()).unwrap();

    let mut solver = leduc_solver(GameConfig::leduc(2), 8);
    solver.train(5_000).unwrap();
    let trained = solver.exploitability().unwrap();
    assert!(trained < uniform, "trained {trained} vs uniform {uniform}");
}

#[test]
fn leduc_keys_include_board_after_first_round() {
    let table = train(2_000, GameConfig::leduc(2), CFRConfig::default().with_seed(2)).unwrap();
    let (first, second): (Vec<_>, Vec<_>) = table
        .iter()
        .map(|(key, _)| key.clone())
        .partition(|key| key.split('|').nth(1) == Some(""));

    assert!(!first.is_empty());
    assert!(!second.is_empty());
    assert!(second.iter().all(|key| key.contains('/')));
    assert!(first.iter().all(|key| !key.contains('/')));
}

#[test]
fn leduc_same_seed_identical() {
    let a = train(1_000, GameConfig::leduc(2), CFRConfig::default().with_seed(99)).unwrap();
    let b = train(1_000, GameConfig::leduc(2), CFRConfig::default().with_seed(99)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn sampled_actions_are_legal_indices() {
    let table = train(1_000, GameConfig::leduc(2), CFRConfig::default().with_seed(4)).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    for (key, entry) in table.iter() {
        let n = entry.probabilities.len();
        let pick = table.sample_action(key, n, &mut rng);
        assert!(pick < n);
        assert!(entry.probabilities[pick] > 0.0, "{key} sampled a zero-probability action");
    }
}

/// Three seats with blinds 10/20 and 320 chip stacks. Expensive: the exact
/// evaluator enumerates every deal of eight cards to three seats.
#[test]
#[ignore]
fn three_player_leduc_checkpoints() {
    let config = GameConfig::leduc(3).with_stack(320).with_blinds(10, 20);
    let mut solver = leduc_solver(config, 42);
    solver
        .train_with_checkpoints(&[1_000, 10_000, 100_000])
        .unwrap();

    let history = &solver.stats().exploitability_history;
    assert_eq!(history.len(), 3);
    for pair in history.windows(2) {
        assert!(
            pair[1].exploitability < pair[0].exploitability,
            "exploitability should fall: {:?}",
            history
        );
    }
}
