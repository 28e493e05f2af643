//! Error types for settlement computation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SettleError>;

/// Why an expense record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseDefect {
    #[error("payer is missing")]
    MissingPayer,

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("no participants are involved")]
    NoParticipants,

    #[error("participant #{position} has a blank name")]
    BlankParticipant { position: usize },
}

/// Errors surfaced to callers of the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettleError {
    /// A record cannot be processed. This is the caller's fault.
    #[error("invalid expense at index {index}: {defect}")]
    InvalidExpense { index: usize, defect: ExpenseDefect },

    /// Balances failed to net to zero. This is a bug in the engine.
    #[error("internal imbalance: balances are off by {residual}")]
    InternalImbalance { residual: Decimal },
}

impl SettleError {
    /// True when the error was caused by bad input rather than the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SettleError::InvalidExpense { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_expense_message() {
        let err = SettleError::InvalidExpense {
            index: 3,
            defect: ExpenseDefect::NonPositiveAmount(dec!(-5)),
        };
        assert_eq!(
            err.to_string(),
            "invalid expense at index 3: amount must be positive, got -5"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_imbalance_is_server_side() {
        let err = SettleError::InternalImbalance {
            residual: dec!(0.50),
        };
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("0.50"));
    }
}
