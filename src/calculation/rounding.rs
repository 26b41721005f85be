//! Money rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary figure to two decimal places, midpoint away from zero.
///
/// The result always carries a scale of two, so it prints as `1000.00`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("1041.665").unwrap()), Decimal::from_str("1041.67").unwrap());
/// assert_eq!(round_money(Decimal::from_str("-0.005").unwrap()), Decimal::from_str("-0.01").unwrap());
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
