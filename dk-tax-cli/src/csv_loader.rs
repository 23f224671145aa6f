//! CSV loader for batches of full-time salary requests.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive. Empty optional cells take the same defaults as
//! the `fulltime` command.
//!
//! | Column                        | Required | Type    | Default             |
//! |-------------------------------|----------|---------|---------------------|
//! | `gross_annual`                | yes      | decimal |                     |
//! | `municipality`                | no       | string  | `København`         |
//! | `church`                      | no       | yes/no  | `yes`               |
//! | `pension_pct`                 | no       | decimal | `4`                 |
//! | `employer_pension_pct`        | no       | decimal | `8`                 |
//! | `atp_monthly`                 | no       | decimal | full-time ATP       |
//! | `other_pay_monthly`           | no       | decimal | `0`                 |
//! | `taxable_benefits_monthly`    | no       | decimal | `0`                 |
//! | `pretax_deductions_monthly`   | no       | decimal | `0`                 |
//! | `aftertax_deductions_monthly` | no       | decimal | `0`                 |
//! | `transport_km`                | no       | decimal | `0`                 |
//! | `union_fees_annual`           | no       | decimal | `0`                 |
//!
//! The `church` column also accepts `true`/`false`, `1`/`0` and `ja`/`nej`.
//!
//! ### Minimal example
//!
//! ```csv
//! gross_annual
//! 480000
//! ```
//!
//! ### Example
//!
//! ```csv
//! gross_annual,municipality,church,pension_pct,transport_km
//! 480000,København,yes,,
//! 620000,Aarhus,no,5,60
//! ```
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::requests::{FullTimeRequest, MunicipalityArgs, PayAdjustmentArgs};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    gross_annual: Decimal,
    municipality: Option<String>,
    church: Option<String>,
    pension_pct: Option<Decimal>,
    employer_pension_pct: Option<Decimal>,
    atp_monthly: Option<Decimal>,
    other_pay_monthly: Option<Decimal>,
    taxable_benefits_monthly: Option<Decimal>,
    pretax_deductions_monthly: Option<Decimal>,
    aftertax_deductions_monthly: Option<Decimal>,
    transport_km: Option<Decimal>,
    union_fees_annual: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `church` cell was not a recognised yes/no value. `row` is the
    /// 1-based data row number (header = row 0).
    #[error("unrecognised church flag '{value}' on row {row}")]
    InvalidChurchFlag { value: String, row: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_church_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "1" | "ja" => Some(true),
        "no" | "false" | "0" | "nej" => Some(false),
        _ => None,
    }
}

/// Convert a single CSV row into a FullTimeRequest.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<FullTimeRequest, CsvLoadError> {
    let church_member = match row.church {
        Some(value) => {
            parse_church_flag(&value).ok_or(CsvLoadError::InvalidChurchFlag {
                value,
                row: row_number,
            })?
        }
        None => true,
    };

    let defaults = FullTimeRequest::new(row.gross_annual);
    let municipality = match row.municipality {
        Some(name) if !name.is_empty() => name,
        _ => defaults.municipality.municipality,
    };
    let adjustments = PayAdjustmentArgs {
        other_pay_monthly: row.other_pay_monthly.unwrap_or_default(),
        taxable_benefits_monthly: row.taxable_benefits_monthly.unwrap_or_default(),
        pretax_deductions_monthly: row.pretax_deductions_monthly.unwrap_or_default(),
        aftertax_deductions_monthly: row.aftertax_deductions_monthly.unwrap_or_default(),
        transport_km: row.transport_km.unwrap_or_default(),
        union_fees_annual: row.union_fees_annual.unwrap_or_default(),
    };

    Ok(FullTimeRequest {
        gross_annual: row.gross_annual,
        pension_pct: row.pension_pct.unwrap_or(defaults.pension_pct),
        employer_pension_pct: row
            .employer_pension_pct
            .unwrap_or(defaults.employer_pension_pct),
        atp_monthly: row.atp_monthly,
        municipality: MunicipalityArgs {
            municipality,
            no_church: !church_member,
        },
        adjustments,
    })
}

/// Parse CSV text and return the requests in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse]: if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [CsvLoadError::InvalidChurchFlag]: if a `church` cell is not a
///   yes/no value.
pub fn load_from_str(input: &str) -> Result<Vec<FullTimeRequest>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
///
/// # Errors
///
/// Returns an io::Error when the file cannot be read, or a
/// [CsvLoadError] when the contents are invalid.
pub fn load_from_file(
    path: &std::path::Path
) -> Result<Vec<FullTimeRequest>, Box<dyn std::error::Error + Send + Sync>> {
    let contents = std::fs::read_to_string(path)?;
    let requests = load_from_str(&contents)?;
    Ok(requests)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
