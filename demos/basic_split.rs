//! Basic expense splitting example.
//!
//! Shows the net-balance settlement of a small dinner group, and how the
//! engine reports a bad record.

use rust_decimal_macros::dec;
use split_settle::core::balance::BalanceSheet;
use split_settle::core::expense::{Expense, ExpenseSet};
use split_settle::settlement::engine::{compute_settlements, SettlementEngine};

fn main() {
    println!("╔═══════════════════════════════════════╗");
    println!("║  split-settle: Basic Split Example    ║");
    println!("╚═══════════════════════════════════════╝\n");

    // --- Scenario 1: one dinner, three people ---
    println!("━━━ Scenario 1: Dinner for three ━━━\n");

    let lines = compute_settlements(&[Expense::new(
        "Alice",
        dec!(100),
        ["Alice", "Bob", "Carol"],
    )]);
    match lines {
        Ok(lines) => lines.iter().for_each(|l| println!("  {}", l)),
        Err(e) => println!("  error: {}", e),
    }
    println!();

    // --- Scenario 2: a few rounds ---
    println!("━━━ Scenario 2: A night out ━━━\n");

    let mut set = ExpenseSet::new();
    set.add(Expense::new("Alice", dec!(100), ["Alice", "Bob", "Carol"]));
    set.add(Expense::new("Bob", dec!(45), ["Alice", "Bob", "Carol"]));
    set.add(Expense::new("Carol", dec!(18.75), ["Bob", "Carol"]));

    match BalanceSheet::from_expenses(&set) {
        Ok(sheet) => {
            println!("Net balances:");
            for (person, balance) in sheet.balances() {
                let status = if *balance > dec!(0) {
                    "is owed"
                } else if *balance < dec!(0) {
                    "owes"
                } else {
                    "is square"
                };
                println!("  {:<8} {:>10.2}  [{}]", person.as_str(), balance, status);
            }
            println!();
        }
        Err(e) => println!("  error: {}", e),
    }

    match SettlementEngine::net_balance(&set) {
        Ok(report) => println!("{}", report),
        Err(e) => println!("  error: {}", e),
    }

    // --- Scenario 3: a record nobody shares ---
    println!("━━━ Scenario 3: Invalid record ━━━\n");

    set.add(Expense::new("Dan", dec!(20), Vec::<&str>::new()));
    match compute_settlements(set.expenses()) {
        Ok(lines) => lines.iter().for_each(|l| println!("  {}", l)),
        Err(e) => println!("  rejected: {}", e),
    }
}
