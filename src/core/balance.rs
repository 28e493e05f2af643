use crate::core::expense::{Expense, ExpenseSet};
use crate::core::money::{round_cents, CENT, EPSILON};
use crate::core::participant::ParticipantId;
use crate::error::{ExpenseDefect, Result, SettleError};
use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net balance of every participant across a batch of expenses.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
///
/// Balances keep full decimal precision; rounding to cents happens in
/// [`BalanceSheet::quantize`]. Entries are ordered by participant so that
/// everything derived from the sheet is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet {
    balances: BTreeMap<ParticipantId, Decimal>,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a batch of expenses into net balances.
    ///
    /// The first invalid record aborts the fold with
    /// [`SettleError::InvalidExpense`] naming its position.
    pub fn from_expenses(expenses: &ExpenseSet) -> Result<Self> {
        let mut sheet = Self::new();
        for (index, expense) in expenses.expenses().iter().enumerate() {
            sheet.apply_expense(expense).map_err(|defect| {
                warn!("Rejecting expense {}: {}", index, defect);
                SettleError::InvalidExpense { index, defect }
            })?;
        }
        debug!(
            "Accumulated {} expenses into {} balances",
            expenses.len(),
            sheet.len()
        );
        Ok(sheet)
    }

    /// Apply one expense: the payer gains the full amount, every involved
    /// participant loses one share.
    pub fn apply_expense(&mut self, expense: &Expense) -> std::result::Result<(), ExpenseDefect> {
        expense.validate()?;
        let split = expense.split_amount().ok_or(ExpenseDefect::NoParticipants)?;

        *self
            .balances
            .entry(expense.payer().clone())
            .or_insert(Decimal::ZERO) += expense.amount();

        for person in expense.involved() {
            *self.balances.entry(person.clone()).or_insert(Decimal::ZERO) -= split;
        }

        debug!(
            "{} paid {} split {} ways ({} each)",
            expense.payer(),
            expense.amount(),
            expense.involved().len(),
            split
        );
        Ok(())
    }

    /// Net balance of a participant; zero if they never appeared.
    pub fn balance(&self, participant: &ParticipantId) -> Decimal {
        self.balances
            .get(participant)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn balances(&self) -> &BTreeMap<ParticipantId, Decimal> {
        &self.balances
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Algebraic sum of all balances. Zero for a consistent sheet, up to
    /// division noise.
    pub fn total(&self) -> Decimal {
        self.balances.values().sum()
    }

    /// True when the balances sum to zero within [`EPSILON`].
    pub fn is_balanced(&self) -> bool {
        self.total().abs() <= EPSILON
    }

    /// Total amount owed to creditors (equivalently, owed by debtors).
    pub fn total_owed(&self) -> Decimal {
        self.balances
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }

    /// Round every balance to cents while keeping the sum exactly zero.
    ///
    /// Each balance is rounded with [`round_cents`]. Whatever whole-cent
    /// drift that leaves is then taken back one cent at a time: from the
    /// participants who gained most from rounding when the drift is
    /// positive, or given to those who lost most when it is negative. Ties
    /// go to the smaller identifier.
    ///
    /// Fails with [`SettleError::InternalImbalance`] when the raw balances
    /// do not sum to zero within [`EPSILON`].
    pub fn quantize(&self) -> Result<BTreeMap<ParticipantId, Decimal>> {
        let total = self.total();
        if total.abs() > EPSILON {
            warn!("Balance sheet does not net to zero: off by {}", total);
            return Err(SettleError::InternalImbalance { residual: total });
        }

        let mut rounded: BTreeMap<ParticipantId, Decimal> = self
            .balances
            .iter()
            .map(|(p, b)| (p.clone(), round_cents(*b)))
            .collect();

        let drift: Decimal = rounded.values().sum();
        if drift.is_zero() {
            return Ok(rounded);
        }

        let steps = (drift.abs() / CENT)
            .to_usize()
            .filter(|steps| *steps <= rounded.len())
            .ok_or(SettleError::InternalImbalance { residual: drift })?;

        // (participant, rounded - raw)
        let mut candidates: Vec<(ParticipantId, Decimal)> = self
            .balances
            .iter()
            .map(|(p, raw)| (p.clone(), round_cents(*raw) - raw))
            .collect();

        let adjustment = if drift > Decimal::ZERO {
            candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            -CENT
        } else {
            candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
            CENT
        };

        for (participant, _) in candidates.into_iter().take(steps) {
            if let Some(balance) = rounded.get_mut(&participant) {
                debug!("Rounding adjustment of {} for {}", adjustment, participant);
                *balance += adjustment;
            }
        }

        Ok(rounded)
    }
}

impl FromIterator<(ParticipantId, Decimal)> for BalanceSheet {
    /// Build a sheet from explicit balances, summing repeated participants.
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Decimal)>>(iter: T) -> Self {
        let mut balances = BTreeMap::new();
        for (participant, amount) in iter {
            *balances.entry(participant).or_insert(Decimal::ZERO) += amount;
        }
        Self { balances }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn id(name: &str) -> ParticipantId {
        ParticipantId::new(name)
    }

    fn sheet_of(expenses: Vec<Expense>) -> BalanceSheet {
        BalanceSheet::from_expenses(&expenses.into()).unwrap()
    }

    #[test]
    fn test_two_person_split() {
        let sheet = sheet_of(vec![Expense::new("A", dec!(100), ["A", "B"])]);
        assert_eq!(sheet.balance(&id("A")), dec!(50));
        assert_eq!(sheet.balance(&id("B")), dec!(-50));
        assert!(sheet.is_balanced());
        assert_eq!(sheet.total_owed(), dec!(50));
    }

    #[test]
    fn test_payer_not_involved() {
        let sheet = sheet_of(vec![Expense::new("A", dec!(60), ["B", "C"])]);
        assert_eq!(sheet.balance(&id("A")), dec!(60));
        assert_eq!(sheet.balance(&id("B")), dec!(-30));
        assert_eq!(sheet.balance(&id("C")), dec!(-30));
    }

    #[test]
    fn test_sole_participant_nets_to_zero() {
        let sheet = sheet_of(vec![Expense::new("A", dec!(42), ["A"])]);
        assert_eq!(sheet.balance(&id("A")), Decimal::ZERO);
        assert_eq!(sheet.total_owed(), Decimal::ZERO);
    }

    #[test]
    fn test_unseen_participant_is_zero() {
        let sheet = sheet_of(vec![Expense::new("A", dec!(10), ["B"])]);
        assert_eq!(sheet.balance(&id("Z")), Decimal::ZERO);
    }

    #[test]
    fn test_mutual_expenses_cancel() {
        let sheet = sheet_of(vec![
            Expense::new("A", dec!(25), ["B"]),
            Expense::new("B", dec!(25), ["A"]),
        ]);
        assert_eq!(sheet.balance(&id("A")), Decimal::ZERO);
        assert_eq!(sheet.balance(&id("B")), Decimal::ZERO);
    }

    #[test]
    fn test_order_independent() {
        let forward = sheet_of(vec![
            Expense::new("A", dec!(30), ["A", "B", "C"]),
            Expense::new("B", dec!(12.50), ["A", "C"]),
        ]);
        let backward = sheet_of(vec![
            Expense::new("B", dec!(12.50), ["A", "C"]),
            Expense::new("A", dec!(30), ["A", "B", "C"]),
        ]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_invalid_record_aborts_fold() {
        let set: ExpenseSet = vec![
            Expense::new("A", dec!(10), ["B"]),
            Expense::new("A", dec!(10), ["B"]),
            Expense::new("", dec!(10), ["B"]),
        ]
        .into();
        assert_eq!(
            BalanceSheet::from_expenses(&set),
            Err(SettleError::InvalidExpense {
                index: 2,
                defect: ExpenseDefect::MissingPayer,
            })
        );
    }

    #[test]
    fn test_quantize_three_way_split_sums_to_zero() {
        let sheet = sheet_of(vec![Expense::new("A", dec!(100), ["A", "B", "C"])]);
        let q = sheet.quantize().unwrap();
        assert_eq!(q.values().sum::<Decimal>(), Decimal::ZERO);
        assert_eq!(q[&id("A")], dec!(66.66));
        assert_eq!(q[&id("B")], dec!(-33.33));
        assert_eq!(q[&id("C")], dec!(-33.33));
    }

    #[test]
    fn test_quantize_negative_drift() {
        // Raw: A +0.004, B +0.004, C -0.008 -> rounded 0, 0, -0.01
        let sheet: BalanceSheet = [
            (id("A"), dec!(0.004)),
            (id("B"), dec!(0.004)),
            (id("C"), dec!(-0.008)),
        ]
        .into_iter()
        .collect();
        let q = sheet.quantize().unwrap();
        assert_eq!(q.values().sum::<Decimal>(), Decimal::ZERO);
        // A and B both lost 0.004 to rounding; A wins the tie.
        assert_eq!(q[&id("A")], dec!(0.01));
        assert_eq!(q[&id("B")], Decimal::ZERO);
    }

    #[test]
    fn test_quantize_rejects_unbalanced_sheet() {
        let sheet: BalanceSheet = [(id("A"), dec!(10)), (id("B"), dec!(-9))]
            .into_iter()
            .collect();
        assert!(!sheet.is_balanced());
        assert_eq!(
            sheet.quantize(),
            Err(SettleError::InternalImbalance { residual: dec!(1) })
        );
    }

    #[test]
    fn test_sheet_serializes_as_map() {
        let sheet = sheet_of(vec![Expense::new("A", dec!(10), ["B"])]);
        let json = serde_json::to_value(&sheet).unwrap();
        let b: Decimal = json["B"].as_str().unwrap().parse().unwrap();
        assert_eq!(json["A"], "10");
        assert_eq!(b, dec!(-10));
    }
}
