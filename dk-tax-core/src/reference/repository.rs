use thiserror::Error;

use crate::models::{Municipality, TaxYearConstants};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("no reference data for tax year {0}")]
    UnknownTaxYear(i32),

    #[error("unknown municipality: {0}")]
    UnknownMunicipality(String),
}

/// Read-only access to the published constants and municipality rates.
///
/// Implementations are built once and never mutated, so every method takes
/// `&self` and the trait is shareable across threads.
pub trait ReferenceRepository: Send + Sync {
    // Tax year constants
    fn constants(&self, tax_year: i32) -> Result<TaxYearConstants, ReferenceError>;
    fn list_tax_years(&self) -> Vec<i32>;

    // Municipalities
    fn municipality(
        &self,
        tax_year: i32,
        name: &str,
    ) -> Result<Municipality, ReferenceError>;

    /// All municipalities for the year, sorted by name.
    fn municipalities(&self, tax_year: i32) -> Result<Vec<Municipality>, ReferenceError>;
}
