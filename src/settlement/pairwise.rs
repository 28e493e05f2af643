//! Pairwise running ledger.
//!
//! Tracks what each pair of participants owes each other directly, without
//! netting across the group. Reversed debts cancel within their pair, but a
//! chain like A → B → C stays as two transfers. Use the net-balance matcher
//! when the fewest transfers matter; use this when people want to see who
//! covered whom.

use crate::core::expense::{Expense, ExpenseSet};
use crate::core::money::{round_cents, EPSILON};
use crate::core::participant::ParticipantId;
use crate::error::{ExpenseDefect, Result, SettleError};
use crate::settlement::matcher::{Settlement, SettlementOutcome};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Debts between unordered pairs of participants.
///
/// Each pair is stored once under `(lo, hi)` with `lo < hi`. A positive
/// amount means `lo` owes `hi`; a negative amount means `hi` owes `lo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairwiseLedger {
    debts: BTreeMap<(ParticipantId, ParticipantId), Decimal>,
}

impl PairwiseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a batch of expenses into pairwise debts.
    pub fn from_expenses(expenses: &ExpenseSet) -> Result<Self> {
        let mut ledger = Self::new();
        for (index, expense) in expenses.expenses().iter().enumerate() {
            ledger.apply_expense(expense).map_err(|defect| {
                warn!("Rejecting expense {}: {}", index, defect);
                SettleError::InvalidExpense { index, defect }
            })?;
        }
        debug!("Pairwise ledger holds {} open pairs", ledger.open_pairs());
        Ok(ledger)
    }

    /// Every involved participant other than the payer owes the payer one share.
    pub fn apply_expense(&mut self, expense: &Expense) -> std::result::Result<(), ExpenseDefect> {
        expense.validate()?;
        let split = expense.split_amount().ok_or(ExpenseDefect::NoParticipants)?;
        for person in expense.involved() {
            if person != expense.payer() {
                self.record_debt(person, expense.payer(), split);
            }
        }
        Ok(())
    }

    /// Record that `debtor` owes `creditor` a further `amount`.
    pub fn record_debt(&mut self, debtor: &ParticipantId, creditor: &ParticipantId, amount: Decimal) {
        if debtor == creditor {
            return;
        }
        let key = Self::key(debtor, creditor);
        let signed = if debtor < creditor { amount } else { -amount };
        let entry = self.debts.entry(key.clone()).or_insert(Decimal::ZERO);
        *entry += signed;
        if entry.is_zero() {
            self.debts.remove(&key);
        }
    }

    /// Net amount `debtor` owes `creditor`; negative when the debt runs the
    /// other way.
    pub fn owed(&self, debtor: &ParticipantId, creditor: &ParticipantId) -> Decimal {
        let amount = self
            .debts
            .get(&Self::key(debtor, creditor))
            .copied()
            .unwrap_or(Decimal::ZERO);
        if debtor < creditor {
            amount
        } else {
            -amount
        }
    }

    /// Number of pairs with a non-negligible debt.
    pub fn open_pairs(&self) -> usize {
        self.debts.values().filter(|v| v.abs() > EPSILON).count()
    }

    /// One transfer per open pair, in pair order.
    pub fn settlements(&self) -> SettlementOutcome {
        let transfers = self
            .debts
            .iter()
            .filter_map(|((lo, hi), amount)| {
                let rounded = round_cents(amount.abs());
                if rounded <= EPSILON {
                    return None;
                }
                let settlement = if *amount > Decimal::ZERO {
                    Settlement::new(lo.clone(), hi.clone(), rounded)
                } else {
                    Settlement::new(hi.clone(), lo.clone(), rounded)
                };
                Some(settlement)
            })
            .collect();
        SettlementOutcome::from_transfers(transfers)
    }

    fn key(a: &ParticipantId, b: &ParticipantId) -> (ParticipantId, ParticipantId) {
        if a < b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }
}
