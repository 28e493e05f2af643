//! Numeric policy for currency amounts.
//!
//! All amounts are `rust_decimal::Decimal`. Balances keep full precision
//! while they accumulate and are only rounded to cents when settlements
//! are produced.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places shown for any amount.
pub const CENT_SCALE: u32 = 2;

/// One cent, the smallest amount that can change hands.
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, CENT_SCALE);

/// Anything at or below this magnitude counts as zero.
pub const EPSILON: Decimal = CENT;

/// Rounding applied to every user-visible amount: half away from zero.
///
/// `2.345` becomes `2.35` and `-2.345` becomes `-2.35`.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Round an amount to whole cents using [`ROUNDING`].
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_SCALE, ROUNDING)
}

/// True when `amount` is within [`EPSILON`] of zero.
pub fn is_negligible(amount: Decimal) -> bool {
    amount.abs() <= EPSILON
}

/// Render an amount with exactly two decimal places, e.g. `50.00`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_cents(amount))
}

/// Build an amount from a whole number of cents.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, CENT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cent_constant() {
        assert_eq!(CENT, dec!(0.01));
        assert_eq!(EPSILON, dec!(0.01));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_cents(dec!(2.345)), dec!(2.35));
        assert_eq!(round_cents(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_cents(dec!(2.344)), dec!(2.34));
        assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
    }

    #[test]
    fn test_format_pads_to_two_places() {
        assert_eq!(format_amount(dec!(50)), "50.00");
        assert_eq!(format_amount(dec!(33.3)), "33.30");
        assert_eq!(format_amount(dec!(33.333333)), "33.33");
        assert_eq!(format_amount(dec!(0.005)), "0.01");
    }

    #[test]
    fn test_negligible() {
        assert!(is_negligible(dec!(0.01)));
        assert!(is_negligible(dec!(-0.009)));
        assert!(!is_negligible(dec!(0.011)));
        assert!(!is_negligible(dec!(-0.02)));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(from_cents(1234), dec!(12.34));
        assert_eq!(from_cents(-5), dec!(-0.05));
    }
}
