//! Turning balances into transfers.

pub mod engine;
pub mod matcher;
pub mod pairwise;
pub mod summary;
