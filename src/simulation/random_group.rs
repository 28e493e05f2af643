//! Random expense groups for benchmarks, property tests and demos.

use crate::core::expense::{Expense, ExpenseSet};
use crate::core::money::from_cents;
use crate::core::participant::ParticipantId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shape of a randomly generated group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of people in the group.
    pub people: usize,
    /// Number of expenses to generate.
    pub expenses: usize,
    /// Smallest expense, in cents.
    pub min_cents: i64,
    /// Largest expense, in cents (exclusive).
    pub max_cents: i64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            people: 6,
            expenses: 20,
            min_cents: 100,
            max_cents: 50_000,
        }
    }
}

/// Generate valid expenses among `config.people` participants.
///
/// Every expense has a random payer, a cent-precision amount in
/// `[min_cents, max_cents)` and a random non-empty set of sharers.
pub fn generate_random_group(config: &GroupConfig) -> ExpenseSet {
    let mut rng = rand::thread_rng();
    let people: Vec<ParticipantId> = (0..config.people.max(1))
        .map(|i| ParticipantId::new(format!("P{:03}", i)))
        .collect();
    let min_cents = config.min_cents.max(1);
    let max_cents = config.max_cents.max(min_cents + 1);

    (0..config.expenses)
        .filter_map(|_| {
            let payer = people.choose(&mut rng)?.clone();
            let amount = from_cents(rng.gen_range(min_cents..max_cents));
            let sharers = rng.gen_range(1..=people.len());
            let involved: Vec<ParticipantId> =
                people.choose_multiple(&mut rng, sharers).cloned().collect();
            Some(Expense::new(payer, amount, involved))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::engine::SettlementEngine;

    #[test]
    fn test_random_group_generation() {
        let config = GroupConfig {
            people: 5,
            expenses: 12,
            ..Default::default()
        };
        let set = generate_random_group(&config);
        assert_eq!(set.len(), 12);
        assert!(set.participants().len() <= 5);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_random_group_settles() {
        let set = generate_random_group(&GroupConfig::default());
        let report = SettlementEngine::net_balance(&set).unwrap();
        assert!(report.transfer_count() < set.participants().len().max(1));
    }

    #[test]
    fn test_degenerate_config_still_valid() {
        let config = GroupConfig {
            people: 0,
            expenses: 3,
            min_cents: 0,
            max_cents: 0,
        };
        let set = generate_random_group(&config);
        assert_eq!(set.len(), 3);
        assert!(set.validate().is_ok());
    }
}
