//! Input validation shared by every calculator entry point.
//!
//! Values are rejected, never clamped: a negative amount or a rate outside
//! its range is a caller error and is reported with the offending field.
//! Amounts are capped at [`MAX_AMOUNT`] so that the sums and products of a
//! calculation stay inside `Decimal`'s range.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::models::MunicipalityRates;

/// Errors that can occur before a calculation starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A numeric field violates its documented range.
    #[error("invalid {field}: {reason}, got {value}")]
    InvalidInput {
        field: &'static str,
        value: Decimal,
        reason: &'static str,
    },
}

impl CalculationError {
    pub fn invalid(
        field: &'static str,
        value: Decimal,
        reason: &'static str,
    ) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason,
        }
    }
}

/// Largest magnitude accepted for any money amount or quantity (10^15).
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Rejects amounts whose magnitude exceeds [`MAX_AMOUNT`].
pub fn ensure_within_max(
    field: &'static str,
    value: Decimal,
) -> Result<(), CalculationError> {
    if value.abs() > MAX_AMOUNT {
        return Err(CalculationError::invalid(
            field,
            value,
            "exceeds the supported maximum",
        ));
    }
    Ok(())
}

/// Rejects negative money amounts and amounts above [`MAX_AMOUNT`].
pub fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), CalculationError> {
    if value < Decimal::ZERO {
        return Err(CalculationError::invalid(
            field,
            value,
            "must be non-negative",
        ));
    }
    ensure_within_max(field, value)
}

/// Rejects fractions outside [0, 1].
pub fn ensure_fraction(
    field: &'static str,
    value: Decimal,
) -> Result<(), CalculationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(CalculationError::invalid(
            field,
            value,
            "must be a fraction between 0 and 1",
        ));
    }
    Ok(())
}

/// Rejects display percentages outside [0, 100].
pub fn ensure_percentage(
    field: &'static str,
    value: Decimal,
) -> Result<(), CalculationError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(CalculationError::invalid(
            field,
            value,
            "must be a percentage between 0 and 100",
        ));
    }
    Ok(())
}

/// Validates both municipality percentages.
pub fn ensure_municipality_rates(rates: &MunicipalityRates) -> Result<(), CalculationError> {
    ensure_percentage("municipal_tax_pct", rates.municipal_tax_pct)?;
    ensure_percentage("church_tax_pct", rates.church_tax_pct)
}
