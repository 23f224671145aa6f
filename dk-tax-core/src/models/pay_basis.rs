use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxYearConstants;

/// How an employee is paid, which decides the holiday-pay rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PayBasis {
    /// Monthly salary (funktionær): 1 % ferietillæg.
    #[default]
    Salaried,
    /// Hourly wage: 12.5 % feriepenge.
    Hourly,
}

impl PayBasis {
    pub fn holiday_rate(
        &self,
        constants: &TaxYearConstants,
    ) -> Decimal {
        match self {
            Self::Salaried => constants.holiday_supplement_rate,
            Self::Hourly => constants.holiday_pay_rate,
        }
    }
}
