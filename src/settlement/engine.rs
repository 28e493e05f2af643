use crate::core::balance::BalanceSheet;
use crate::core::expense::{Expense, ExpenseSet};
use crate::core::money::format_amount;
use crate::error::Result;
use crate::settlement::matcher::{Settlement, SettlementMatcher, SettlementOutcome};
use crate::settlement::pairwise::PairwiseLedger;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How debts are turned into transfers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Net everyone's balance across the group, then match greedily.
    /// Minimizes the number of transfers.
    #[default]
    NetBalance,
    /// Keep a running debt per pair of participants.
    Pairwise,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}' (expected 'net' or 'pairwise')")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "net" | "net-balance" => Ok(Strategy::NetBalance),
            "pairwise" => Ok(Strategy::Pairwise),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::NetBalance => write!(f, "net-balance"),
            Strategy::Pairwise => write!(f, "pairwise"),
        }
    }
}

/// Result of settling one batch of expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    strategy: Strategy,
    outcome: SettlementOutcome,
    /// Number of distinct participants in the batch.
    participant_count: usize,
    /// Sum of all expense amounts.
    total_spent: Decimal,
}

impl SettlementReport {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn outcome(&self) -> &SettlementOutcome {
        &self.outcome
    }

    pub fn transfers(&self) -> &[Settlement] {
        self.outcome.transfers()
    }

    pub fn is_all_square(&self) -> bool {
        self.outcome.is_all_square()
    }

    /// Display lines, including the "no debts" sentinel.
    pub fn lines(&self) -> Vec<String> {
        self.outcome.lines()
    }

    pub fn transfer_count(&self) -> usize {
        self.outcome.transfers().len()
    }

    /// Total money that changes hands.
    pub fn total_transferred(&self) -> Decimal {
        self.outcome.transfers().iter().map(|s| s.amount).sum()
    }

    pub fn participant_count(&self) -> usize {
        self.participant_count
    }

    pub fn total_spent(&self) -> Decimal {
        self.total_spent
    }
}

impl fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlements ({}) ===", self.strategy)?;
        writeln!(f, "Participants:   {}", self.participant_count)?;
        writeln!(f, "Total spent:    ${}", format_amount(self.total_spent))?;
        writeln!(f, "Transfers:      {}", self.transfer_count())?;
        writeln!(f, "Moved:          ${}", format_amount(self.total_transferred()))?;
        writeln!(f)?;
        for line in self.lines() {
            writeln!(f, "  {}", line)?;
        }
        Ok(())
    }
}

/// Entry point for settling expenses.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Settle a batch with the given strategy.
    pub fn run(strategy: Strategy, expenses: &ExpenseSet) -> Result<SettlementReport> {
        let outcome = match strategy {
            Strategy::NetBalance => {
                let sheet = BalanceSheet::from_expenses(expenses)?;
                SettlementMatcher::settle(&sheet)?
            }
            Strategy::Pairwise => PairwiseLedger::from_expenses(expenses)?.settlements(),
        };
        debug!(
            "{} strategy produced {} transfers",
            strategy,
            outcome.transfers().len()
        );

        Ok(SettlementReport {
            strategy,
            outcome,
            participant_count: expenses.participants().len(),
            total_spent: expenses.total_spent(),
        })
    }

    /// Settle with [`Strategy::NetBalance`].
    pub fn net_balance(expenses: &ExpenseSet) -> Result<SettlementReport> {
        Self::run(Strategy::NetBalance, expenses)
    }

    /// Settle with [`Strategy::Pairwise`].
    pub fn pairwise(expenses: &ExpenseSet) -> Result<SettlementReport> {
        Self::run(Strategy::Pairwise, expenses)
    }
}

/// Compute who owes whom, as display lines.
///
/// Uses the net-balance strategy. Returns the single line
/// `"No debts found!"` when everybody is square, and fails on the first
/// invalid expense.
///
/// # Examples
///
/// ```
/// use split_settle::compute_settlements;
/// use split_settle::core::expense::Expense;
/// use rust_decimal_macros::dec;
///
/// let lines = compute_settlements(&[Expense::new("A", dec!(100), ["A", "B"])]).unwrap();
/// assert_eq!(lines, vec!["B owes A $50.00"]);
/// ```
pub fn compute_settlements(expenses: &[Expense]) -> Result<Vec<String>> {
    let set = ExpenseSet::from(expenses.to_vec());
    Ok(SettlementEngine::net_balance(&set)?.lines())
}
