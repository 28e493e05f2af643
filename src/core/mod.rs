//! Foundational types: participants, expenses, money policy, balances.

pub mod balance;
pub mod expense;
pub mod money;
pub mod participant;
