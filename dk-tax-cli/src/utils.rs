use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"480,000"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Converts a whole-number percentage (`4` for 4 %) into a fraction.
pub fn percent_to_fraction(pct: Decimal) -> Decimal {
    pct / Decimal::ONE_HUNDRED
}

/// Converts a monthly amount into an annual one. Saturates at the `Decimal`
/// bounds; the engine rejects a saturated amount as out of range.
pub fn monthly_to_annual(monthly: Decimal) -> Decimal {
    monthly.saturating_mul(Decimal::from(12))
}
