//! Train a Kuhn or Leduc strategy and print it.
//!
//! Usage:
//!   cargo run --release --bin train -- [OPTIONS]
//!
//! Examples:
//!   train --variant kuhn --iterations 100000 --seed 42 --exploitability
//!   train --variant leduc --players 3 --stack 320 --small-blind 10 --big-blind 20 \
//!         --checkpoints 1000,10000,100000
//!
//! Set `RUST_LOG=info` for solver progress lines.

use std::error::Error;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mccfr_solver::cfr::{CFRConfig, CFRSolver, StrategyTable};
use mccfr_solver::games::poker::{GameConfig, PokerGame, Variant};

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train an MCCFR strategy for Kuhn or Leduc poker")]
struct Cli {
    /// Poker variant: kuhn or leduc
    #[arg(long, default_value = "kuhn")]
    variant: Variant,

    /// Number of seats (2 or 3)
    #[arg(long, default_value_t = 2)]
    players: usize,

    /// Starting stack per seat (variant default if omitted)
    #[arg(long)]
    stack: Option<u32>,

    /// Small blind; requires --big-blind and replaces the ante
    #[arg(long, requires = "big_blind")]
    small_blind: Option<u32>,

    /// Big blind; bets become one big blind, then two
    #[arg(long)]
    big_blind: Option<u32>,

    /// MCCFR iterations to run
    #[arg(short, long, default_value_t = 100_000)]
    iterations: u64,

    /// Random seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Uniform exploration mixed into opponent sampling, in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    exploration: f64,

    /// Floor negative regrets at zero
    #[arg(long)]
    cfr_plus: bool,

    /// Weight strategy sums by iteration
    #[arg(long)]
    linear: bool,

    /// Report exact exploitability of the final strategy
    #[arg(long)]
    exploitability: bool,

    /// Measure exploitability at these iteration counts (comma separated);
    /// training stops at the last one instead of --iterations
    #[arg(long, value_delimiter = ',')]
    checkpoints: Vec<u64>,

    /// Print the strategy table as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let mut config = GameConfig::for_variant(self.variant, self.players);
        if let Some(big) = self.big_blind {
            config = config.with_blinds(self.small_blind.unwrap_or(big / 2), big);
        }
        if let Some(stack) = self.stack {
            config = config.with_stack(stack);
        }
        config
    }

    fn solver_config(&self) -> CFRConfig {
        let mut config = CFRConfig::default()
            .with_cfr_plus(self.cfr_plus)
            .with_linear_cfr(self.linear)
            .with_exploration(self.exploration);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn print_table(table: &StrategyTable) {
    println!("{:<16} strategy", "info set");
    for (key, entry) in table.iter() {
        let cells: Vec<String> = entry
            .probabilities
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let name = entry.actions.get(i).map(String::as_str).unwrap_or("?");
                format!("{}={:.3}", name, p)
            })
            .collect();
        println!("{:<16} {}", key, cells.join("  "));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let game = PokerGame::new(cli.game_config())?;
    let mut solver = CFRSolver::new(game, cli.solver_config())?;

    if cli.checkpoints.is_empty() {
        let bar = ProgressBar::new(cli.iterations);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg} ({eta})")?
                .progress_chars("#>-"),
        );
        let step = (cli.iterations / 100).max(1);
        solver.train_with_callback(cli.iterations, step, |stats| {
            bar.set_position(stats.iterations);
            bar.set_message(format!("{} info sets", stats.info_sets));
        })?;
        bar.finish_and_clear();
    } else {
        let points = solver.train_with_checkpoints(&cli.checkpoints)?;
        for point in &points.exploitability_history {
            eprintln!("iteration {:>10}  exploitability {:.6}", point.iteration, point.exploitability);
        }
    }

    let stats = solver.stats();
    eprintln!(
        "{} iterations, {} info sets, {:.2}s ({:.0} it/s)",
        stats.iterations, stats.info_sets, stats.elapsed_seconds, stats.iterations_per_second
    );

    if cli.exploitability {
        eprintln!("exploitability {:.6}", solver.exploitability()?);
    }

    let table = solver.strategy_table();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print_table(&table);
    }

    Ok(())
}
