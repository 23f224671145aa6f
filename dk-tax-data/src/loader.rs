use std::collections::HashSet;
use std::io::Read;

use dk_tax_core::{ConstantsError, Municipality, TaxYearConstants};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading reference data.
#[derive(Debug, Error)]
pub enum ReferenceLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid constants: {0}")]
    InvalidConstants(#[from] ConstantsError),

    #[error("Municipality '{name}': {field} must be between 0 and 100, got {value}")]
    PercentageOutOfRange {
        name: String,
        field: &'static str,
        value: Decimal,
    },

    #[error("Municipality '{0}' appears more than once")]
    DuplicateMunicipality(String),

    #[error("Municipality table is empty")]
    EmptyMunicipalityTable,
}

impl From<csv::Error> for ReferenceLoaderError {
    fn from(err: csv::Error) -> Self {
        ReferenceLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for ReferenceLoaderError {
    fn from(err: toml::de::Error) -> Self {
        ReferenceLoaderError::TomlParse(err.to_string())
    }
}

/// A single record from the municipality CSV file.
///
/// - `name`: The municipality name, e.g. `København`
/// - `municipal_tax_pct`: Municipal tax as a percentage, e.g. `23.39`
/// - `church_tax_pct`: Church tax as a percentage, e.g. `0.80`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MunicipalityRecord {
    pub name: String,
    pub municipal_tax_pct: Decimal,
    pub church_tax_pct: Decimal,
}

impl MunicipalityRecord {
    pub fn into_municipality(
        self,
        tax_year: i32,
    ) -> Municipality {
        Municipality {
            tax_year,
            name: self.name,
            municipal_tax_pct: self.municipal_tax_pct,
            church_tax_pct: self.church_tax_pct,
        }
    }
}

/// Loader for the municipality rate table.
pub struct MunicipalityLoader;

impl MunicipalityLoader {
    /// Parse municipality records from a CSV reader.
    ///
    /// Names are trimmed. Every percentage must lie in [0, 100] and every
    /// name must be unique.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<MunicipalityRecord>, ReferenceLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for result in csv_reader.deserialize() {
            let record: MunicipalityRecord = result?;
            Self::check_percentage(&record.name, "municipal_tax_pct", record.municipal_tax_pct)?;
            Self::check_percentage(&record.name, "church_tax_pct", record.church_tax_pct)?;
            if !seen.insert(record.name.clone()) {
                return Err(ReferenceLoaderError::DuplicateMunicipality(record.name));
            }
            records.push(record);
        }

        if records.is_empty() {
            return Err(ReferenceLoaderError::EmptyMunicipalityTable);
        }

        Ok(records)
    }

    fn check_percentage(
        name: &str,
        field: &'static str,
        value: Decimal,
    ) -> Result<(), ReferenceLoaderError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(ReferenceLoaderError::PercentageOutOfRange {
                name: name.to_string(),
                field,
                value,
            });
        }
        Ok(())
    }
}

/// Loader for a tax year's constants table.
pub struct ConstantsLoader;

impl ConstantsLoader {
    /// Parse and validate a constants table from TOML.
    pub fn parse(source: &str) -> Result<TaxYearConstants, ReferenceLoaderError> {
        let constants: TaxYearConstants = toml::from_str(source)?;
        constants.validate()?;
        Ok(constants)
    }
}
