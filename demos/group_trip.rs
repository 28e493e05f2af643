//! Comparing settlement strategies on a generated group trip.
//!
//! The net-balance strategy minimizes the number of transfers; the
//! pairwise strategy keeps each pair's debts separate.

use split_settle::settlement::engine::{SettlementEngine, Strategy};
use split_settle::settlement::summary::GroupSummary;
use split_settle::simulation::random_group::{generate_random_group, GroupConfig};

fn main() {
    println!("╔═══════════════════════════════════════════╗");
    println!("║  split-settle: Group Trip Comparison      ║");
    println!("╚═══════════════════════════════════════════╝\n");

    let config = GroupConfig {
        people: 5,
        expenses: 15,
        ..Default::default()
    };
    let set = generate_random_group(&config);

    match GroupSummary::from_expenses(&set) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            println!("error: {}", e);
            return;
        }
    }

    for strategy in [Strategy::NetBalance, Strategy::Pairwise] {
        match SettlementEngine::run(strategy, &set) {
            Ok(report) => println!("{}", report),
            Err(e) => println!("{} failed: {}", strategy, e),
        }
    }
}
