use crate::core::balance::BalanceSheet;
use crate::core::expense::ExpenseSet;
use crate::core::money::format_amount;
use crate::core::participant::ParticipantId;
use crate::error::{Result, SettleError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What one participant paid and consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    /// Total this participant paid out of pocket.
    pub paid: Decimal,
    /// Total of this participant's shares.
    pub share: Decimal,
}

impl ParticipantSummary {
    /// `paid - share`: positive when the group owes this participant.
    pub fn net(&self) -> Decimal {
        self.paid - self.share
    }
}

/// Per-participant breakdown of a batch of expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub participants: BTreeMap<ParticipantId, ParticipantSummary>,
    pub total_spent: Decimal,
    pub expense_count: usize,
}

impl GroupSummary {
    pub fn from_expenses(expenses: &ExpenseSet) -> Result<Self> {
        expenses.validate()?;

        let mut participants: BTreeMap<ParticipantId, ParticipantSummary> = BTreeMap::new();
        for expense in expenses.expenses() {
            participants
                .entry(expense.payer().clone())
                .or_default()
                .paid += expense.amount();

            if let Some(split) = expense.split_amount() {
                for person in expense.involved() {
                    participants.entry(person.clone()).or_default().share += split;
                }
            }
        }

        Ok(GroupSummary {
            participants,
            total_spent: expenses.total_spent(),
            expense_count: expenses.len(),
        })
    }

    /// Net balances derived from the summary, as the accumulator would
    /// produce them.
    pub fn balance_sheet(&self) -> BalanceSheet {
        self.participants
            .iter()
            .map(|(p, s)| (p.clone(), s.net()))
            .collect()
    }

    /// Net balance of one participant; zero if unknown.
    pub fn net(&self, participant: &ParticipantId) -> Decimal {
        self.participants
            .get(participant)
            .map(ParticipantSummary::net)
            .unwrap_or(Decimal::ZERO)
    }

    /// Fails when paid and consumed totals disagree beyond rounding noise.
    pub fn check_consistency(&self) -> Result<()> {
        let sheet = self.balance_sheet();
        if sheet.is_balanced() {
            Ok(())
        } else {
            Err(SettleError::InternalImbalance {
                residual: sheet.total(),
            })
        }
    }
}

impl std::fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Group Summary ===")?;
        writeln!(f, "Expenses:    {}", self.expense_count)?;
        writeln!(f, "Total spent: ${}", format_amount(self.total_spent))?;
        writeln!(f)?;
        writeln!(
            f,
            "  {:<16} {:>12} {:>12} {:>12}",
            "Participant", "Paid", "Share", "Net"
        )?;
        for (participant, summary) in &self.participants {
            writeln!(
                f,
                "  {:<16} {:>12} {:>12} {:>12}",
                participant.as_str(),
                format_amount(summary.paid),
                format_amount(summary.share),
                format_amount(summary.net())
            )?;
        }
        Ok(())
    }
}
