use crate::core::participant::ParticipantId;
use crate::error::{ExpenseDefect, Result, SettleError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One payment event: somebody paid `amount` on behalf of everyone in
/// `involved`, who share it equally.
///
/// The payer may or may not be listed in `involved`. A participant listed
/// twice carries two shares.
///
/// Construction never fails; [`Expense::validate`] reports whether the
/// record can be settled. Missing JSON fields deserialize to blank values
/// so that they are reported as defects rather than parse errors.
///
/// # Examples
///
/// ```
/// use split_settle::core::expense::Expense;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new("Alice", dec!(90), ["Alice", "Bob", "Carol"]);
/// assert!(dinner.validate().is_ok());
/// assert_eq!(dinner.split_amount(), Some(dec!(30)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expense {
    /// Who paid.
    payer: ParticipantId,
    /// Total cost.
    amount: Decimal,
    /// Who shares the cost.
    involved: Vec<ParticipantId>,
}

impl Expense {
    pub fn new<P, I>(payer: impl Into<ParticipantId>, amount: Decimal, involved: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self {
            payer: payer.into(),
            amount,
            involved: involved.into_iter().map(Into::into).collect(),
        }
    }

    /// Check the record against the rules every settled expense obeys.
    pub fn validate(&self) -> std::result::Result<(), ExpenseDefect> {
        if self.payer.is_blank() {
            return Err(ExpenseDefect::MissingPayer);
        }
        if self.amount <= Decimal::ZERO {
            return Err(ExpenseDefect::NonPositiveAmount(self.amount));
        }
        if self.involved.is_empty() {
            return Err(ExpenseDefect::NoParticipants);
        }
        if let Some(position) = self.involved.iter().position(ParticipantId::is_blank) {
            return Err(ExpenseDefect::BlankParticipant { position });
        }
        Ok(())
    }

    /// Each participant's share, or `None` when nobody is involved.
    pub fn split_amount(&self) -> Option<Decimal> {
        if self.involved.is_empty() {
            return None;
        }
        Some(self.amount / Decimal::from(self.involved.len()))
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn involved(&self) -> &[ParticipantId] {
        &self.involved
    }
}

/// An ordered batch of expenses submitted for settlement.
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseSet {
    expenses: Vec<Expense>,
}

impl ExpenseSet {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
        }
    }

    pub fn add(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Validate every record, failing on the first bad one.
    pub fn validate(&self) -> Result<()> {
        for (index, expense) in self.expenses.iter().enumerate() {
            expense
                .validate()
                .map_err(|defect| SettleError::InvalidExpense { index, defect })?;
        }
        Ok(())
    }

    /// Sum of all amounts paid.
    pub fn total_spent(&self) -> Decimal {
        self.expenses.iter().map(Expense::amount).sum()
    }

    /// Every participant mentioned as payer or sharer, sorted and deduplicated.
    pub fn participants(&self) -> Vec<ParticipantId> {
        let mut participants: Vec<ParticipantId> = self
            .expenses
            .iter()
            .flat_map(|e| std::iter::once(e.payer()).chain(e.involved()))
            .cloned()
            .collect();
        participants.sort();
        participants.dedup();
        participants
    }
}

impl FromIterator<Expense> for ExpenseSet {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Expense>> for ExpenseSet {
    fn from(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_creation() {
        let e = Expense::new("A", dec!(100), ["A", "B"]);
        assert_eq!(e.payer().as_str(), "A");
        assert_eq!(e.amount(), dec!(100));
        assert_eq!(e.involved().len(), 2);
        assert_eq!(e.split_amount(), Some(dec!(50)));
    }

    #[test]
    fn test_expense_zero_amount_rejected() {
        let e = Expense::new("A", Decimal::ZERO, ["B"]);
        assert_eq!(
            e.validate(),
            Err(ExpenseDefect::NonPositiveAmount(Decimal::ZERO))
        );
    }

    #[test]
    fn test_expense_negative_amount_rejected() {
        let e = Expense::new("A", dec!(-10), ["B"]);
        assert!(matches!(
            e.validate(),
            Err(ExpenseDefect::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_expense_without_participants() {
        let e = Expense::new("A", dec!(10), Vec::<&str>::new());
        assert_eq!(e.validate(), Err(ExpenseDefect::NoParticipants));
        assert_eq!(e.split_amount(), None);
    }

    #[test]
    fn test_expense_blank_payer_and_participant() {
        let e = Expense::new(" ", dec!(10), ["B"]);
        assert_eq!(e.validate(), Err(ExpenseDefect::MissingPayer));

        let e = Expense::new("A", dec!(10), ["B", ""]);
        assert_eq!(
            e.validate(),
            Err(ExpenseDefect::BlankParticipant { position: 1 })
        );
    }

    #[test]
    fn test_missing_json_fields_become_defects() {
        let e: Expense = serde_json::from_str(r#"{"amount": 12}"#).unwrap();
        assert_eq!(e.validate(), Err(ExpenseDefect::MissingPayer));

        let e: Expense = serde_json::from_str(r#"{"payer": "A", "involved": ["B"]}"#).unwrap();
        assert_eq!(
            e.validate(),
            Err(ExpenseDefect::NonPositiveAmount(Decimal::ZERO))
        );
    }

    #[test]
    fn test_amount_accepts_number_or_string() {
        let a: Expense =
            serde_json::from_str(r#"{"payer": "A", "amount": 42, "involved": ["B"]}"#).unwrap();
        let b: Expense =
            serde_json::from_str(r#"{"payer": "A", "amount": "42", "involved": ["B"]}"#).unwrap();
        assert_eq!(a.amount(), dec!(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_validate_reports_index() {
        let set: ExpenseSet = vec![
            Expense::new("A", dec!(10), ["B"]),
            Expense::new("B", dec!(10), Vec::<&str>::new()),
        ]
        .into();
        assert_eq!(
            set.validate(),
            Err(SettleError::InvalidExpense {
                index: 1,
                defect: ExpenseDefect::NoParticipants,
            })
        );
    }

    #[test]
    fn test_set_totals_and_participants() {
        let mut set = ExpenseSet::new();
        set.add(Expense::new("B", dec!(100), ["A", "B"]));
        set.add(Expense::new("C", dec!(200.50), ["A"]));
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_spent(), dec!(300.50));
        let participants = set.participants();
        let names: Vec<&str> = participants.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn test_set_is_bare_json_array() {
        let set: ExpenseSet =
            serde_json::from_str(r#"[{"payer": "A", "amount": 5, "involved": ["A", "B"]}]"#)
                .unwrap();
        assert_eq!(set.len(), 1);
        assert!(serde_json::to_string(&set).unwrap().starts_with('['));
    }
}
