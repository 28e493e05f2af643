//! Synthetic expense data for exercising the engine.

pub mod random_group;
