//! Command handlers: municipality lookup, engine call, flat response.
//!
//! The municipality is resolved before any calculator runs, so an unknown
//! name fails fast with [`ReferenceError::UnknownMunicipality`] and the
//! engine never sees it.

use std::collections::BTreeMap;

use dk_tax_core::calculations::{
    CalculationError, CurveBuilder, CurvePoint, EarningsLimitCalculator, EmployeeTaxCalculator,
    EmployeeTaxResult, HoursCurvePoint, PeriodisationCalculator, PeriodisationComparison,
    StudentCurvePoint, StudentIncomeCalculator, StudentIncomeResult,
};
use dk_tax_core::{
    EarningsLimitTier, Municipality, MunicipalityRates, ReferenceError, ReferenceRepository,
    TaxYearConstants,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::requests::{
    CurveRequest, EarningsLimitRequest, FullTimeRequest, HoursCurveRequest, MunicipalityArgs,
    PartTimeRequest, PeriodisationRequest, StudentCurveRequest, StudentRequest,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),
}

/// A calculation result with the municipality it was computed for.
///
/// Serialises flat: the result's fields sit beside the municipality fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeResponse<T> {
    pub municipality: String,
    pub municipal_tax_pct: Decimal,
    pub church_tax_pct: Decimal,
    #[serde(flatten)]
    pub hourly: Option<HourlyDetails>,
    #[serde(flatten)]
    pub result: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyDetails {
    pub hourly_rate: Decimal,
    pub hours_month: Decimal,
}

/// Reference data dump for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaResponse {
    pub tax_year: i32,
    pub tax_years: Vec<i32>,
    pub constants: TaxYearConstants,
    pub municipalities: BTreeMap<String, MunicipalityRates>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarningsLimitResponse {
    pub months: Vec<EarningsLimitTier>,
    pub children: u32,
    pub annual_limit: Decimal,
    pub monthly_average: Decimal,
    /// Monthly gross wages whose own income equals the monthly average.
    pub max_gross_monthly: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_income_monthly: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_income_annual: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_limit: Option<bool>,
}

/// One line of batch output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRow {
    /// 1-based data row number.
    pub row: usize,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    Computed(Box<ComputeResponse<EmployeeTaxResult>>),
    Failed { error: String },
}

/// Constants and municipalities for the tax year of one invocation.
pub struct TaxYearContext<'r, R: ReferenceRepository + ?Sized> {
    reference: &'r R,
    tax_year: i32,
    constants: TaxYearConstants,
}

impl<'r, R: ReferenceRepository + ?Sized> TaxYearContext<'r, R> {
    /// # Errors
    ///
    /// Returns [`ReferenceError::UnknownTaxYear`] when the year is not loaded.
    pub fn new(
        reference: &'r R,
        tax_year: i32,
    ) -> Result<Self, CommandError> {
        let constants = reference.constants(tax_year)?;
        Ok(Self {
            reference,
            tax_year,
            constants,
        })
    }

    pub fn constants(&self) -> &TaxYearConstants {
        &self.constants
    }

    fn municipality(
        &self,
        args: &MunicipalityArgs,
    ) -> Result<Municipality, CommandError> {
        let municipality = self
            .reference
            .municipality(self.tax_year, &args.municipality)?;
        debug!(
            municipality = %municipality.name,
            municipal_tax_pct = %municipality.municipal_tax_pct,
            church_tax_pct = %municipality.church_tax_pct,
            "municipality resolved"
        );
        Ok(municipality)
    }

    fn respond<T>(
        municipality: Municipality,
        hourly: Option<HourlyDetails>,
        result: T,
    ) -> ComputeResponse<T> {
        ComputeResponse {
            municipality: municipality.name,
            municipal_tax_pct: municipality.municipal_tax_pct,
            church_tax_pct: municipality.church_tax_pct,
            hourly,
            result,
        }
    }

    pub fn fulltime(
        &self,
        request: &FullTimeRequest,
    ) -> Result<ComputeResponse<EmployeeTaxResult>, CommandError> {
        let municipality = self.municipality(&request.municipality)?;
        let input = request.to_input(&self.constants, municipality.rates());
        let result = EmployeeTaxCalculator::new(&self.constants).calculate(&input)?;
        Ok(Self::respond(municipality, None, result))
    }

    pub fn parttime(
        &self,
        request: &PartTimeRequest,
    ) -> Result<ComputeResponse<EmployeeTaxResult>, CommandError> {
        let municipality = self.municipality(&request.municipality)?;
        let input = request.to_input(municipality.rates())?;
        let result = EmployeeTaxCalculator::new(&self.constants).calculate(&input)?;
        let hourly = HourlyDetails {
            hourly_rate: request.hourly_rate,
            hours_month: request.hours_month,
        };
        Ok(Self::respond(municipality, Some(hourly), result))
    }

    pub fn student(
        &self,
        request: &StudentRequest,
    ) -> Result<ComputeResponse<StudentIncomeResult>, CommandError> {
        let municipality = self.municipality(&request.municipality)?;
        let input = request.to_input(&self.constants, municipality.rates());
        let result = StudentIncomeCalculator::new(&self.constants).calculate(&input)?;
        Ok(Self::respond(municipality, None, result))
    }

    pub fn curve(
        &self,
        request: &CurveRequest,
    ) -> Result<Vec<CurvePoint>, CommandError> {
        let municipality = self.municipality(&request.municipality)?;
        let template = request.to_template(&self.constants, municipality.rates());
        Ok(CurveBuilder::new(&self.constants).gross_curve(&template, &request.sweep())?)
    }

    pub fn hours_curve(
        &self,
        request: &HoursCurveRequest,
    ) -> Result<Vec<HoursCurvePoint>, CommandError> {
        let municipality = self.municipality(&request.municipality)?;
        let template = request.to_template(municipality.rates());
        Ok(CurveBuilder::new(&self.constants).hours_curve(
            &template,
            request.hourly_rate,
            request.max_hours,
            request.step,
        )?)
    }

    pub fn student_curve(
        &self,
        request: &StudentCurveRequest,
    ) -> Result<Vec<StudentCurvePoint>, CommandError> {
        let municipality = self.municipality(&request.municipality)?;
        let template = request.to_template(&self.constants, municipality.rates());
        Ok(CurveBuilder::new(&self.constants).student_hours_curve(
            &template,
            request.hourly_rate,
            request.max_hours,
            request.step,
        )?)
    }

    pub fn meta(&self) -> Result<MetaResponse, CommandError> {
        let municipalities = self
            .reference
            .municipalities(self.tax_year)?
            .into_iter()
            .map(|m| {
                let rates = m.rates();
                (m.name, rates)
            })
            .collect();

        Ok(MetaResponse {
            tax_year: self.tax_year,
            tax_years: self.reference.list_tax_years(),
            constants: self.constants.clone(),
            municipalities,
        })
    }

    pub fn earnings_limit(
        &self,
        request: &EarningsLimitRequest,
    ) -> Result<EarningsLimitResponse, CommandError> {
        let calculator = EarningsLimitCalculator::new(&self.constants);
        let months = request.tiers();
        let annual_limit =
            calculator.annual_limit(&months, request.education_level(), request.children)?;
        let monthly_average = annual_limit / Decimal::from(12);
        let max_gross_monthly =
            calculator.max_gross_for_own_income(request.pension_rate(), monthly_average)?;

        let own_income_monthly = request
            .gross_monthly
            .map(|gross| calculator.own_income_from_gross(gross, request.pension_rate()))
            .transpose()?;
        let own_income_annual = own_income_monthly.map(|monthly| monthly * Decimal::from(12));

        Ok(EarningsLimitResponse {
            months,
            children: request.children,
            annual_limit,
            monthly_average,
            max_gross_monthly,
            own_income_monthly,
            own_income_annual,
            over_limit: own_income_annual.map(|annual| annual > annual_limit),
        })
    }

    pub fn periodisation(
        &self,
        request: &PeriodisationRequest,
    ) -> Result<PeriodisationComparison, CommandError> {
        let input = request.to_input(&self.constants);
        Ok(PeriodisationCalculator::new(&self.constants).compare(&input)?)
    }

    /// Computes every full-time request independently. A failing row is
    /// reported in its own line and does not stop the batch.
    pub fn batch(
        &self,
        requests: &[FullTimeRequest],
    ) -> Vec<BatchRow> {
        requests
            .iter()
            .enumerate()
            .map(|(idx, request)| {
                let row = idx + 1;
                let outcome = match self.fulltime(request) {
                    Ok(response) => BatchOutcome::Computed(Box::new(response)),
                    Err(err) => {
                        warn!(row, error = %err, "batch row failed");
                        BatchOutcome::Failed {
                            error: err.to_string(),
                        }
                    }
                };
                BatchRow { row, outcome }
            })
            .collect()
    }
}
