//! # split-settle
//!
//! Shared-expense settlement engine.
//!
//! Given expenses where one person pays and a group shares the cost, this
//! crate works out who owes whom, using as few transfers as possible.
//!
//! ## Architecture
//!
//! - **core**: participants, expenses, money policy, the balance sheet
//! - **settlement**: greedy matcher, pairwise ledger, engine, group summary
//! - **simulation**: random expense groups for tests and benchmarks
//!
//! The computation is pure: every call builds its own balances and keeps
//! nothing afterwards.

pub mod core;
pub mod error;
pub mod settlement;
pub mod simulation;

pub use error::{ExpenseDefect, Result, SettleError};
pub use settlement::engine::compute_settlements;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::BalanceSheet;
    pub use crate::core::expense::{Expense, ExpenseSet};
    pub use crate::core::participant::ParticipantId;
    pub use crate::error::{ExpenseDefect, Result, SettleError};
    pub use crate::settlement::engine::{
        compute_settlements, SettlementEngine, SettlementReport, Strategy,
    };
    pub use crate::settlement::matcher::{
        Settlement, SettlementMatcher, SettlementOutcome, NO_DEBTS_MESSAGE,
    };
    pub use crate::settlement::pairwise::PairwiseLedger;
    pub use crate::settlement::summary::GroupSummary;
}
