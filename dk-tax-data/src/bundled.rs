use std::collections::BTreeMap;
use std::io::Read;

use dk_tax_core::{Municipality, ReferenceError, ReferenceRepository, TaxYearConstants};
use tracing::debug;

use crate::loader::{ConstantsLoader, MunicipalityLoader, ReferenceLoaderError};

const CONSTANTS_2026: &str = include_str!("../data/constants_2026.toml");
const MUNICIPALITIES_2026: &str = include_str!("../data/municipalities_2026.csv");

#[derive(Debug, Clone)]
struct YearData {
    constants: TaxYearConstants,
    municipalities: BTreeMap<String, Municipality>,
}

/// In-memory reference data, built once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct BundledReference {
    years: BTreeMap<i32, YearData>,
}

impl BundledReference {
    /// Reference data for every tax year shipped with this crate.
    pub fn load() -> Result<Self, ReferenceLoaderError> {
        let mut reference = Self::default();
        reference.add_year(CONSTANTS_2026, MUNICIPALITIES_2026.as_bytes())?;
        Ok(reference)
    }

    /// Adds one tax year from a constants TOML document and a municipality
    /// CSV. The tax year is taken from the constants table; an existing year
    /// is replaced.
    pub fn add_year<R: Read>(
        &mut self,
        constants_toml: &str,
        municipalities_csv: R,
    ) -> Result<i32, ReferenceLoaderError> {
        let constants = ConstantsLoader::parse(constants_toml)?;
        let tax_year = constants.tax_year;
        let municipalities: BTreeMap<String, Municipality> =
            MunicipalityLoader::parse(municipalities_csv)?
                .into_iter()
                .map(|record| {
                    let municipality = record.into_municipality(tax_year);
                    (municipality.name.clone(), municipality)
                })
                .collect();

        debug!(
            tax_year,
            municipalities = municipalities.len(),
            "reference data loaded"
        );

        self.years.insert(
            tax_year,
            YearData {
                constants,
                municipalities,
            },
        );
        Ok(tax_year)
    }

    fn year(
        &self,
        tax_year: i32,
    ) -> Result<&YearData, ReferenceError> {
        self.years
            .get(&tax_year)
            .ok_or(ReferenceError::UnknownTaxYear(tax_year))
    }
}

impl ReferenceRepository for BundledReference {
    fn constants(&self, tax_year: i32) -> Result<TaxYearConstants, ReferenceError> {
        Ok(self.year(tax_year)?.constants.clone())
    }

    fn list_tax_years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    fn municipality(
        &self,
        tax_year: i32,
        name: &str,
    ) -> Result<Municipality, ReferenceError> {
        self.year(tax_year)?
            .municipalities
            .get(name)
            .cloned()
            .ok_or_else(|| ReferenceError::UnknownMunicipality(name.to_string()))
    }

    fn municipalities(&self, tax_year: i32) -> Result<Vec<Municipality>, ReferenceError> {
        Ok(self.year(tax_year)?.municipalities.values().cloned().collect())
    }
}
