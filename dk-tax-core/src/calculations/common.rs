//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used across the employee and
//! student calculators, including rounding, clamping and the number of
//! months used to spread annual figures.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Months per year; annual figures are divided by this for monthly values.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use dk_tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    round_to(value, 2)
}

/// Rounds a decimal value to `dp` decimal places, midpoints away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use dk_tax_core::calculations::common::round_to;
///
/// assert_eq!(round_to(dec!(25531.5), 0), dec!(25532));
/// assert_eq!(round_to(dec!(36.8049), 2), dec!(36.80));
/// ```
pub fn round_to(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use dk_tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the minimum of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// The part of `amount` lying above zero, i.e. `max(amount, 0)`.
pub fn positive_part(amount: Decimal) -> Decimal {
    max(amount, Decimal::ZERO)
}

/// Converts an annual amount to its monthly average.
pub fn monthly(annual: Decimal) -> Decimal {
    annual / MONTHS_PER_YEAR
}
