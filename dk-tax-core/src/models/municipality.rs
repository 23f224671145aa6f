use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A municipality (kommune) and its published tax percentages for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    pub tax_year: i32,
    pub name: String,
    /// Municipal tax as a display percentage, e.g. `23.39`.
    pub municipal_tax_pct: Decimal,
    /// Church tax as a display percentage, e.g. `0.80`.
    pub church_tax_pct: Decimal,
}

impl Municipality {
    pub fn rates(&self) -> MunicipalityRates {
        MunicipalityRates {
            municipal_tax_pct: self.municipal_tax_pct,
            church_tax_pct: self.church_tax_pct,
        }
    }
}

/// The two percentages the engine needs from a municipality.
///
/// Both are display percentages in [0, 100]; calculations divide by 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityRates {
    pub municipal_tax_pct: Decimal,
    pub church_tax_pct: Decimal,
}

impl MunicipalityRates {
    pub fn new(
        municipal_tax_pct: Decimal,
        church_tax_pct: Decimal,
    ) -> Self {
        Self {
            municipal_tax_pct,
            church_tax_pct,
        }
    }

    pub fn municipal_fraction(&self) -> Decimal {
        self.municipal_tax_pct / Decimal::ONE_HUNDRED
    }

    pub fn church_fraction(&self) -> Decimal {
        self.church_tax_pct / Decimal::ONE_HUNDRED
    }
}
