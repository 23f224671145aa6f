//! Net-income curves for charting.
//!
//! A curve is a batch of independent single-point calculations over a swept
//! gross income or number of monthly hours. Points are evaluated in parallel
//! and returned in sweep order. Display values are rounded here and only
//! here: money to whole kroner, rates to two decimals.

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{MONTHS_PER_YEAR, positive_part, round_half_up, round_to};
use crate::calculations::employee::{EmployeeTaxCalculator, EmployeeTaxInput};
use crate::calculations::student::{StudentIncomeCalculator, StudentIncomeInput};
use crate::calculations::validation::{CalculationError, ensure_non_negative, ensure_within_max};
use crate::{PayBasis, TaxYearConstants};

/// Upper bound on the number of points in one curve.
pub const MAX_CURVE_POINTS: usize = 10_000;

/// Default hours step for the hours curves.
pub const DEFAULT_HOURS_STEP: u32 = 5;

/// How gross annual values are swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrossSweep {
    /// `points + 1` evenly spaced values from 0 to `max_gross`.
    Points { max_gross: Decimal, points: u32 },
    /// From `max(min_gross, 0)` to `max_gross` inclusive, in steps of
    /// `step_monthly × 12`.
    Step {
        min_gross: Decimal,
        max_gross: Decimal,
        step_monthly: Decimal,
    },
}

impl GrossSweep {
    /// Gross annual values in sweep order.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a non-positive step or
    /// point count, a negative maximum, or a sweep longer than
    /// [`MAX_CURVE_POINTS`].
    pub fn values(&self) -> Result<Vec<Decimal>, CalculationError> {
        match *self {
            Self::Points { max_gross, points } => {
                ensure_non_negative("max_gross", max_gross)?;
                if points == 0 {
                    return Err(CalculationError::invalid(
                        "points",
                        Decimal::ZERO,
                        "must be positive",
                    ));
                }
                ensure_point_count("points", Decimal::from(points) + Decimal::ONE)?;

                let step = max_gross / Decimal::from(points);
                Ok((0..=points).map(|i| step * Decimal::from(i)).collect())
            }
            Self::Step {
                min_gross,
                max_gross,
                step_monthly,
            } => {
                if step_monthly <= Decimal::ZERO {
                    return Err(CalculationError::invalid(
                        "step_monthly",
                        step_monthly,
                        "must be positive",
                    ));
                }
                ensure_within_max("step_monthly", step_monthly)?;
                ensure_within_max("min_gross", min_gross)?;
                ensure_within_max("max_gross", max_gross)?;
                let step_annual = step_monthly * MONTHS_PER_YEAR;
                let start = positive_part(min_gross);
                if start > max_gross {
                    return Ok(Vec::new());
                }
                let count = (max_gross - start)
                    .checked_div(step_annual)
                    .map(|steps| steps.floor() + Decimal::ONE)
                    .ok_or(CalculationError::invalid(
                        "step_monthly",
                        step_monthly,
                        "sweep has too many points",
                    ))?;
                ensure_point_count("step_monthly", count)?;

                let mut values = Vec::new();
                let mut gross = start;
                while gross <= max_gross {
                    values.push(gross);
                    gross += step_annual;
                }
                Ok(values)
            }
        }
    }
}

fn ensure_point_count(
    field: &'static str,
    count: Decimal,
) -> Result<(), CalculationError> {
    if count > Decimal::from(MAX_CURVE_POINTS) {
        return Err(CalculationError::invalid(
            field,
            count,
            "sweep has too many points",
        ));
    }
    Ok(())
}

/// Hours swept from 0 to `max_hours` inclusive.
fn hours_values(
    max_hours: u32,
    step_hours: u32,
) -> Result<Vec<u32>, CalculationError> {
    if step_hours == 0 {
        return Err(CalculationError::invalid(
            "step_hours",
            Decimal::ZERO,
            "must be positive",
        ));
    }
    let count = u64::from(max_hours / step_hours) + 1;
    ensure_point_count("max_hours", Decimal::from(count))?;
    Ok((0..=max_hours).step_by(step_hours as usize).collect())
}

/// One point on a gross-income curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub gross_annual: Decimal,
    pub gross_monthly: Decimal,
    pub net_monthly: Decimal,
    pub effective_rate: Decimal,
}

/// One point on a monthly-hours curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursCurvePoint {
    pub hours_month: u32,
    pub gross_monthly: Decimal,
    pub net_monthly: Decimal,
    pub effective_rate: Decimal,
}

/// One point on a student hours curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCurvePoint {
    pub hours_month: u32,
    pub work_gross_monthly: Decimal,
    pub net_monthly: Decimal,
    pub grant_repayment: Decimal,
    pub over_earnings_limit: bool,
}

/// Sweeps the calculators over a range of inputs.
#[derive(Debug, Clone)]
pub struct CurveBuilder<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> CurveBuilder<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// Net income across a gross sweep. Every field of `template` except the
    /// gross is held fixed.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for an invalid sweep or
    /// template.
    pub fn gross_curve(
        &self,
        template: &EmployeeTaxInput,
        sweep: &GrossSweep,
    ) -> Result<Vec<CurvePoint>, CalculationError> {
        template.validate()?;
        let values = sweep.values()?;
        let calculator = EmployeeTaxCalculator::new(self.constants);

        debug!(points = values.len(), "computing gross curve");

        values
            .par_iter()
            .map(|&gross_annual| -> Result<CurvePoint, CalculationError> {
                let input = EmployeeTaxInput {
                    gross_annual,
                    ..template.clone()
                };
                let result = calculator.calculate(&input)?;
                Ok(CurvePoint {
                    gross_annual: round_to(gross_annual, 0),
                    gross_monthly: round_to(gross_annual / MONTHS_PER_YEAR, 0),
                    net_monthly: round_to(result.net_monthly, 0),
                    effective_rate: round_half_up(result.effective_tax_rate),
                })
            })
            .collect()
    }

    /// Net income across monthly hours at `hourly_rate`. The template's pay
    /// basis is forced to hourly.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a negative rate, a zero
    /// step or an invalid template.
    pub fn hours_curve(
        &self,
        template: &EmployeeTaxInput,
        hourly_rate: Decimal,
        max_hours: u32,
        step_hours: u32,
    ) -> Result<Vec<HoursCurvePoint>, CalculationError> {
        ensure_non_negative("hourly_rate", hourly_rate)?;
        template.validate()?;
        let hours = hours_values(max_hours, step_hours)?;
        let calculator = EmployeeTaxCalculator::new(self.constants);

        debug!(points = hours.len(), %hourly_rate, "computing hours curve");

        hours
            .par_iter()
            .map(|&hours_month| -> Result<HoursCurvePoint, CalculationError> {
                let gross_monthly = hourly_rate * Decimal::from(hours_month);
                let input = EmployeeTaxInput {
                    gross_annual: gross_monthly * MONTHS_PER_YEAR,
                    pay_basis: PayBasis::Hourly,
                    ..template.clone()
                };
                let result = calculator.calculate(&input)?;
                Ok(HoursCurvePoint {
                    hours_month,
                    gross_monthly: round_to(gross_monthly, 0),
                    net_monthly: round_to(result.net_monthly, 0),
                    effective_rate: round_half_up(result.effective_tax_rate),
                })
            })
            .collect()
    }

    /// Student net income across monthly work hours at `hourly_rate`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a negative rate, a zero
    /// step or an invalid template.
    pub fn student_hours_curve(
        &self,
        template: &StudentIncomeInput,
        hourly_rate: Decimal,
        max_hours: u32,
        step_hours: u32,
    ) -> Result<Vec<StudentCurvePoint>, CalculationError> {
        ensure_non_negative("hourly_rate", hourly_rate)?;
        template.validate()?;
        let hours = hours_values(max_hours, step_hours)?;
        let calculator = StudentIncomeCalculator::new(self.constants);

        debug!(points = hours.len(), %hourly_rate, "computing student hours curve");

        hours
            .par_iter()
            .map(|&hours_month| -> Result<StudentCurvePoint, CalculationError> {
                let monthly_work_gross = hourly_rate * Decimal::from(hours_month);
                let input = StudentIncomeInput {
                    monthly_work_gross,
                    ..template.clone()
                };
                let result = calculator.calculate(&input)?;
                Ok(StudentCurvePoint {
                    hours_month,
                    work_gross_monthly: round_to(monthly_work_gross, 0),
                    net_monthly: round_to(result.net_monthly, 0),
                    grant_repayment: round_to(result.grant_repayment, 0),
                    over_earnings_limit: result.over_earnings_limit,
                })
            })
            .collect()
    }
}
