//! Command-line requests and their conversion into engine inputs.
//!
//! Requests speak the language of a payslip: percentages are whole numbers
//! (`4` for 4 %) and most amounts are monthly. The conversions divide
//! percentages by 100 and multiply monthly amounts by 12 before the engine
//! sees them.

use clap::Args;
use dk_tax_core::calculations::common::MONTHS_PER_YEAR;
use dk_tax_core::calculations::{
    CalculationError, DEFAULT_HOURS_STEP, EmployeeTaxInput, GrossSweep, PeriodisationInput,
    StudentIncomeInput, ensure_non_negative,
};
use dk_tax_core::{
    EarningsLimitTier, EducationLevel, MunicipalityRates, PayBasis, TaxYearConstants,
};
use rust_decimal::Decimal;

use crate::utils::{monthly_to_annual, parse_decimal, percent_to_fraction};

pub const DEFAULT_MUNICIPALITY: &str = "København";

/// Municipality and church membership.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct MunicipalityArgs {
    /// Municipality (kommune) name
    #[arg(long, default_value = DEFAULT_MUNICIPALITY)]
    pub municipality: String,

    /// Not a member of the national church
    #[arg(long)]
    pub no_church: bool,
}

impl Default for MunicipalityArgs {
    fn default() -> Self {
        Self {
            municipality: DEFAULT_MUNICIPALITY.to_string(),
            no_church: false,
        }
    }
}

impl MunicipalityArgs {
    pub fn church_member(&self) -> bool {
        !self.no_church
    }
}

/// Payslip lines besides the base salary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Args)]
pub struct PayAdjustmentArgs {
    /// Extra cash pay per month (allowances, broadband)
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub other_pay_monthly: Decimal,

    /// Taxable non-cash benefits per month
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub taxable_benefits_monthly: Decimal,

    /// Deducted from pay before tax, per month
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub pretax_deductions_monthly: Decimal,

    /// Deducted from pay after tax, per month
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub aftertax_deductions_monthly: Decimal,

    /// Daily round-trip commute in km
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub transport_km: Decimal,

    /// Union and unemployment-fund fees per year
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub union_fees_annual: Decimal,
}

impl PayAdjustmentArgs {
    fn apply(
        &self,
        input: EmployeeTaxInput,
    ) -> EmployeeTaxInput {
        EmployeeTaxInput {
            other_pay_annual: monthly_to_annual(self.other_pay_monthly),
            taxable_benefits_annual: monthly_to_annual(self.taxable_benefits_monthly),
            pretax_deductions_annual: monthly_to_annual(self.pretax_deductions_monthly),
            aftertax_deductions_annual: monthly_to_annual(self.aftertax_deductions_monthly),
            transport_km: self.transport_km,
            union_fees_annual: self.union_fees_annual,
            ..input
        }
    }
}

// ---------------------------------------------------------------------------
// Single calculations
// ---------------------------------------------------------------------------

/// A salaried full-time employee.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct FullTimeRequest {
    /// Gross annual salary in DKK
    #[arg(value_parser = parse_decimal)]
    pub gross_annual: Decimal,

    /// Employee pension in percent of salary
    #[arg(long, value_parser = parse_decimal, default_value = "4")]
    pub pension_pct: Decimal,

    /// Employer pension in percent of salary
    #[arg(long, value_parser = parse_decimal, default_value = "8")]
    pub employer_pension_pct: Decimal,

    /// Monthly ATP; defaults to the full-time rate of the tax year
    #[arg(long, value_parser = parse_decimal)]
    pub atp_monthly: Option<Decimal>,

    #[command(flatten)]
    pub municipality: MunicipalityArgs,

    #[command(flatten)]
    pub adjustments: PayAdjustmentArgs,
}

impl FullTimeRequest {
    /// A request with the command-line defaults.
    pub fn new(gross_annual: Decimal) -> Self {
        Self {
            gross_annual,
            pension_pct: Decimal::from(4),
            employer_pension_pct: Decimal::from(8),
            atp_monthly: None,
            municipality: MunicipalityArgs::default(),
            adjustments: PayAdjustmentArgs::default(),
        }
    }

    pub fn to_input(
        &self,
        constants: &TaxYearConstants,
        rates: MunicipalityRates,
    ) -> EmployeeTaxInput {
        let input = EmployeeTaxInput {
            employee_pension_rate: percent_to_fraction(self.pension_pct),
            employer_pension_rate: percent_to_fraction(self.employer_pension_pct),
            church_member: self.municipality.church_member(),
            atp_monthly: self.atp_monthly.unwrap_or(constants.atp.fulltime_monthly),
            ..EmployeeTaxInput::new(self.gross_annual, rates)
        };
        self.adjustments.apply(input)
    }
}

/// An hourly-paid employee.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct PartTimeRequest {
    /// Hourly rate in DKK
    #[arg(value_parser = parse_decimal)]
    pub hourly_rate: Decimal,

    /// Hours worked per month
    #[arg(value_parser = parse_decimal)]
    pub hours_month: Decimal,

    /// Employee pension in percent of pay
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub pension_pct: Decimal,

    /// Employer pension in percent of pay
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub employer_pension_pct: Decimal,

    /// Monthly ATP (0 below 9 hours a week)
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub atp_monthly: Decimal,

    #[command(flatten)]
    pub municipality: MunicipalityArgs,

    #[command(flatten)]
    pub adjustments: PayAdjustmentArgs,
}

impl PartTimeRequest {
    /// Hourly rate × hours × 12.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] naming `hourly_rate` or
    /// `hours_month` when either is negative or the product is out of range.
    pub fn gross_annual(&self) -> Result<Decimal, CalculationError> {
        ensure_non_negative("hourly_rate", self.hourly_rate)?;
        ensure_non_negative("hours_month", self.hours_month)?;
        self.hourly_rate
            .checked_mul(self.hours_month)
            .and_then(|monthly| monthly.checked_mul(MONTHS_PER_YEAR))
            .ok_or(CalculationError::invalid(
                "hourly_rate",
                self.hourly_rate,
                "pay for the given hours exceeds the supported maximum",
            ))
    }

    pub fn to_input(
        &self,
        rates: MunicipalityRates,
    ) -> Result<EmployeeTaxInput, CalculationError> {
        let input = EmployeeTaxInput {
            employee_pension_rate: percent_to_fraction(self.pension_pct),
            employer_pension_rate: percent_to_fraction(self.employer_pension_pct),
            church_member: self.municipality.church_member(),
            pay_basis: PayBasis::Hourly,
            atp_monthly: self.atp_monthly,
            ..EmployeeTaxInput::new(self.gross_annual()?, rates)
        };
        Ok(self.adjustments.apply(input))
    }
}

/// A student on the grant with a side job.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct StudentRequest {
    /// Gross work income per month
    #[arg(value_parser = parse_decimal)]
    pub work_gross_monthly: Decimal,

    /// Monthly grant before tax; defaults to the away-from-home rate
    #[arg(long, value_parser = parse_decimal)]
    pub grant_monthly: Option<Decimal>,

    /// Employee pension in percent of pay
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub pension_pct: Decimal,

    /// Employer pension in percent of pay
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub employer_pension_pct: Decimal,

    /// Annual earnings limit; defaults to twelve grant months
    #[arg(long, value_parser = parse_decimal, allow_hyphen_values = true)]
    pub earnings_limit: Option<Decimal>,

    #[command(flatten)]
    pub municipality: MunicipalityArgs,
}

impl StudentRequest {
    pub fn to_input(
        &self,
        constants: &TaxYearConstants,
        rates: MunicipalityRates,
    ) -> StudentIncomeInput {
        student_input(
            constants,
            rates,
            StudentTerms {
                grant_monthly: self.grant_monthly,
                pension_pct: self.pension_pct,
                employer_pension_pct: self.employer_pension_pct,
                earnings_limit: self.earnings_limit,
                church_member: self.municipality.church_member(),
            },
            self.work_gross_monthly,
        )
    }
}

struct StudentTerms {
    grant_monthly: Option<Decimal>,
    pension_pct: Decimal,
    employer_pension_pct: Decimal,
    earnings_limit: Option<Decimal>,
    church_member: bool,
}

fn student_input(
    constants: &TaxYearConstants,
    rates: MunicipalityRates,
    terms: StudentTerms,
    work_gross_monthly: Decimal,
) -> StudentIncomeInput {
    let grant = terms
        .grant_monthly
        .unwrap_or(constants.student_grant.away_from_home_monthly);
    StudentIncomeInput {
        employee_pension_rate: percent_to_fraction(terms.pension_pct),
        employer_pension_rate: percent_to_fraction(terms.employer_pension_pct),
        church_member: terms.church_member,
        annual_earnings_limit: terms.earnings_limit,
        ..StudentIncomeInput::new(grant, work_gross_monthly, rates)
    }
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

/// Net income across a range of gross salaries.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CurveRequest {
    #[arg(long, value_parser = parse_decimal, default_value = "4")]
    pub pension_pct: Decimal,

    #[arg(long, value_parser = parse_decimal, default_value = "8")]
    pub employer_pension_pct: Decimal,

    /// Monthly ATP; defaults to the full-time rate of the tax year
    #[arg(long, value_parser = parse_decimal)]
    pub atp_monthly: Option<Decimal>,

    /// Paid by the hour (hourly holiday-pay rate)
    #[arg(long)]
    pub hourly: bool,

    /// Highest gross annual salary
    #[arg(long, value_parser = parse_decimal, default_value = "1200000")]
    pub max_gross: Decimal,

    /// Lowest gross annual salary; only used with --step-monthly
    #[arg(long, value_parser = parse_decimal, default_value = "0", allow_hyphen_values = true)]
    pub min_gross: Decimal,

    /// Step in monthly gross; 0 sweeps --points even steps instead
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub step_monthly: Decimal,

    /// Number of even steps from 0 to --max-gross
    #[arg(long, default_value_t = 50)]
    pub points: u32,

    #[command(flatten)]
    pub municipality: MunicipalityArgs,

    #[command(flatten)]
    pub adjustments: PayAdjustmentArgs,
}

impl CurveRequest {
    /// The employee input every point shares; gross is left at zero.
    pub fn to_template(
        &self,
        constants: &TaxYearConstants,
        rates: MunicipalityRates,
    ) -> EmployeeTaxInput {
        let pay_basis = if self.hourly {
            PayBasis::Hourly
        } else {
            PayBasis::Salaried
        };
        let input = EmployeeTaxInput {
            employee_pension_rate: percent_to_fraction(self.pension_pct),
            employer_pension_rate: percent_to_fraction(self.employer_pension_pct),
            church_member: self.municipality.church_member(),
            pay_basis,
            atp_monthly: self.atp_monthly.unwrap_or(constants.atp.fulltime_monthly),
            ..EmployeeTaxInput::new(Decimal::ZERO, rates)
        };
        self.adjustments.apply(input)
    }

    pub fn sweep(&self) -> GrossSweep {
        if self.step_monthly > Decimal::ZERO {
            GrossSweep::Step {
                min_gross: self.min_gross,
                max_gross: self.max_gross,
                step_monthly: self.step_monthly,
            }
        } else {
            GrossSweep::Points {
                max_gross: self.max_gross,
                points: self.points,
            }
        }
    }
}

/// Net income across monthly hours at a fixed hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct HoursCurveRequest {
    /// Hourly rate in DKK
    #[arg(value_parser = parse_decimal)]
    pub hourly_rate: Decimal,

    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub pension_pct: Decimal,

    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub employer_pension_pct: Decimal,

    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub atp_monthly: Decimal,

    /// Highest number of hours per month
    #[arg(long, default_value_t = 220)]
    pub max_hours: u32,

    /// Hours between points
    #[arg(long, default_value_t = DEFAULT_HOURS_STEP)]
    pub step: u32,

    #[command(flatten)]
    pub municipality: MunicipalityArgs,

    #[command(flatten)]
    pub adjustments: PayAdjustmentArgs,
}

impl HoursCurveRequest {
    pub fn to_template(
        &self,
        rates: MunicipalityRates,
    ) -> EmployeeTaxInput {
        let input = EmployeeTaxInput {
            employee_pension_rate: percent_to_fraction(self.pension_pct),
            employer_pension_rate: percent_to_fraction(self.employer_pension_pct),
            church_member: self.municipality.church_member(),
            pay_basis: PayBasis::Hourly,
            atp_monthly: self.atp_monthly,
            ..EmployeeTaxInput::new(Decimal::ZERO, rates)
        };
        self.adjustments.apply(input)
    }
}

/// Student net income across monthly work hours.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct StudentCurveRequest {
    /// Student hourly wage in DKK
    #[arg(value_parser = parse_decimal)]
    pub hourly_rate: Decimal,

    /// Monthly grant before tax; defaults to the away-from-home rate
    #[arg(long, value_parser = parse_decimal)]
    pub grant_monthly: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub pension_pct: Decimal,

    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub employer_pension_pct: Decimal,

    /// Annual earnings limit; defaults to twelve grant months
    #[arg(long, value_parser = parse_decimal, allow_hyphen_values = true)]
    pub earnings_limit: Option<Decimal>,

    #[arg(long, default_value_t = 220)]
    pub max_hours: u32,

    #[arg(long, default_value_t = DEFAULT_HOURS_STEP)]
    pub step: u32,

    #[command(flatten)]
    pub municipality: MunicipalityArgs,
}

impl StudentCurveRequest {
    /// The student input every point shares; work income is left at zero.
    pub fn to_template(
        &self,
        constants: &TaxYearConstants,
        rates: MunicipalityRates,
    ) -> StudentIncomeInput {
        student_input(
            constants,
            rates,
            StudentTerms {
                grant_monthly: self.grant_monthly,
                pension_pct: self.pension_pct,
                employer_pension_pct: self.employer_pension_pct,
                earnings_limit: self.earnings_limit,
                church_member: self.municipality.church_member(),
            },
            Decimal::ZERO,
        )
    }
}

// ---------------------------------------------------------------------------
// Earnings-limit planning
// ---------------------------------------------------------------------------

/// Parses one month tier for `--months`.
pub fn parse_tier(s: &str) -> Result<EarningsLimitTier, String> {
    EarningsLimitTier::parse(s.trim()).ok_or_else(|| {
        format!("unknown month '{s}' (expected grant, opted-out or not-enrolled)")
    })
}

fn education_level(youth: bool) -> EducationLevel {
    if youth {
        EducationLevel::Youth
    } else {
        EducationLevel::HigherEducation
    }
}

/// Annual earnings limit from the situation in each month.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct EarningsLimitRequest {
    /// Twelve comma-separated months: grant, opted-out or not-enrolled.
    /// Defaults to twelve grant months.
    #[arg(long, value_delimiter = ',', value_parser = parse_tier)]
    pub months: Vec<EarningsLimitTier>,

    /// Youth education (lower limit in grant months)
    #[arg(long)]
    pub youth: bool,

    /// Number of children
    #[arg(long, default_value_t = 0)]
    pub children: u32,

    /// Monthly gross wages to express as own income
    #[arg(long, value_parser = parse_decimal)]
    pub gross_monthly: Option<Decimal>,

    /// Employee pension in percent of pay
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub pension_pct: Decimal,
}

impl EarningsLimitRequest {
    pub fn tiers(&self) -> Vec<EarningsLimitTier> {
        if self.months.is_empty() {
            vec![EarningsLimitTier::ReceivingGrant; 12]
        } else {
            self.months.clone()
        }
    }

    pub fn education_level(&self) -> EducationLevel {
        education_level(self.youth)
    }

    pub fn pension_rate(&self) -> Decimal {
        percent_to_fraction(self.pension_pct)
    }
}

/// A student starting or finishing during the year.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct PeriodisationRequest {
    /// First enrolled month (1-12)
    #[arg(long)]
    pub start_month: u32,

    /// Last enrolled month (1-12)
    #[arg(long)]
    pub end_month: u32,

    /// Enrolled months with grant; defaults to every enrolled month
    #[arg(long)]
    pub grant_months: Option<u32>,

    /// Monthly grant before tax; defaults to the away-from-home rate
    #[arg(long, value_parser = parse_decimal)]
    pub grant_monthly: Option<Decimal>,

    /// Average gross wages per enrolled month
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub enrolled_gross_monthly: Decimal,

    /// Employee pension in percent of enrolled wages
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub pension_pct: Decimal,

    /// Total gross wages for the months outside education
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    pub outside_gross_total: Decimal,

    /// Youth education (lower limit in grant months)
    #[arg(long)]
    pub youth: bool,

    /// Number of children
    #[arg(long, default_value_t = 0)]
    pub children: u32,
}

impl PeriodisationRequest {
    pub fn to_input(
        &self,
        constants: &TaxYearConstants,
    ) -> PeriodisationInput {
        let mut input = PeriodisationInput {
            start_month: self.start_month,
            end_month: self.end_month,
            grant_months: self.grant_months.unwrap_or(0),
            monthly_grant: self
                .grant_monthly
                .unwrap_or(constants.student_grant.away_from_home_monthly),
            enrolled_monthly_gross: self.enrolled_gross_monthly,
            enrolled_pension_rate: percent_to_fraction(self.pension_pct),
            outside_total_gross: self.outside_gross_total,
            education_level: education_level(self.youth),
            children: self.children,
        };
        if self.grant_months.is_none() {
            input.grant_months = input.enrolled_months();
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use dk_tax_core::ReferenceRepository;
    use dk_tax_data::BundledReference;

    fn constants() -> TaxYearConstants {
        BundledReference::load()
            .expect("bundled data must load")
            .constants(2026)
            .expect("2026 must exist")
    }

    fn copenhagen() -> MunicipalityRates {
        MunicipalityRates::new(dec!(23.39), dec!(0.80))
    }

    // =========================================================================
    // FullTimeRequest tests
    // =========================================================================

    #[test]
    fn fulltime_defaults_divide_percentages_and_use_fulltime_atp() {
        let constants = constants();

        let input = FullTimeRequest::new(dec!(480000)).to_input(&constants, copenhagen());

        assert_eq!(input.gross_annual, dec!(480000));
        assert_eq!(input.employee_pension_rate, dec!(0.04));
        assert_eq!(input.employer_pension_rate, dec!(0.08));
        assert_eq!(input.atp_monthly, dec!(99));
        assert_eq!(input.pay_basis, PayBasis::Salaried);
        assert!(input.church_member);
        assert!(input.has_employment_income);
    }

    #[test]
    fn fulltime_monthly_adjustments_become_annual() {
        let constants = constants();
        let request = FullTimeRequest {
            adjustments: PayAdjustmentArgs {
                other_pay_monthly: dec!(300),
                taxable_benefits_monthly: dec!(500),
                pretax_deductions_monthly: dec!(100),
                aftertax_deductions_monthly: dec!(250),
                transport_km: dec!(60),
                union_fees_annual: dec!(6000),
            },
            ..FullTimeRequest::new(dec!(480000))
        };

        let input = request.to_input(&constants, copenhagen());

        assert_eq!(input.other_pay_annual, dec!(3600));
        assert_eq!(input.taxable_benefits_annual, dec!(6000));
        assert_eq!(input.pretax_deductions_annual, dec!(1200));
        assert_eq!(input.aftertax_deductions_annual, dec!(3000));
        assert_eq!(input.transport_km, dec!(60));
        assert_eq!(input.union_fees_annual, dec!(6000));
    }

    #[test]
    fn fulltime_explicit_atp_and_no_church() {
        let constants = constants();
        let request = FullTimeRequest {
            atp_monthly: Some(dec!(0)),
            municipality: MunicipalityArgs {
                municipality: "Aarhus".to_string(),
                no_church: true,
            },
            ..FullTimeRequest::new(dec!(300000))
        };

        let input = request.to_input(&constants, copenhagen());

        assert_eq!(input.atp_monthly, dec!(0));
        assert!(!input.church_member);
    }

    // =========================================================================
    // PartTimeRequest tests
    // =========================================================================

    fn parttime_request(
        hourly_rate: Decimal,
        hours_month: Decimal,
    ) -> PartTimeRequest {
        PartTimeRequest {
            hourly_rate,
            hours_month,
            pension_pct: dec!(0),
            employer_pension_pct: dec!(0),
            atp_monthly: dec!(0),
            municipality: MunicipalityArgs::default(),
            adjustments: PayAdjustmentArgs::default(),
        }
    }

    #[test]
    fn parttime_gross_is_rate_times_hours_times_twelve() {
        let request = parttime_request(dec!(200), dec!(100));

        let input = request.to_input(copenhagen()).unwrap();

        assert_eq!(request.gross_annual(), Ok(dec!(240000)));
        assert_eq!(input.gross_annual, dec!(240000));
        assert_eq!(input.pay_basis, PayBasis::Hourly);
        assert_eq!(input.atp_monthly, dec!(0));
    }

    #[test]
    fn parttime_negative_hours_names_the_hours_field() {
        let request = parttime_request(dec!(150), dec!(-160));

        assert_eq!(
            request.to_input(copenhagen()),
            Err(CalculationError::InvalidInput {
                field: "hours_month",
                value: dec!(-160),
                reason: "must be non-negative",
            })
        );
    }

    #[test]
    fn parttime_two_negatives_do_not_cancel() {
        let request = parttime_request(dec!(-150), dec!(-160));

        assert!(matches!(
            request.gross_annual(),
            Err(CalculationError::InvalidInput { field: "hourly_rate", .. })
        ));
    }

    #[test]
    fn parttime_overflowing_pay_is_rejected() {
        let max = dk_tax_core::calculations::MAX_AMOUNT;
        let request = parttime_request(max, max);

        assert!(matches!(
            request.gross_annual(),
            Err(CalculationError::InvalidInput {
                field: "hourly_rate",
                reason: "pay for the given hours exceeds the supported maximum",
                ..
            })
        ));
    }

    // =========================================================================
    // StudentRequest tests
    // =========================================================================

    #[test]
    fn student_defaults_to_away_from_home_grant() {
        let constants = constants();
        let request = StudentRequest {
            work_gross_monthly: dec!(10000),
            grant_monthly: None,
            pension_pct: dec!(0),
            employer_pension_pct: dec!(0),
            earnings_limit: None,
            municipality: MunicipalityArgs::default(),
        };

        let input = request.to_input(&constants, copenhagen());

        assert_eq!(input.monthly_grant, dec!(7426));
        assert_eq!(input.monthly_work_gross, dec!(10000));
        assert_eq!(input.annual_earnings_limit, None);
        assert!(input.church_member);
    }

    #[test]
    fn student_keeps_negative_limit_override() {
        let constants = constants();
        let request = StudentRequest {
            work_gross_monthly: dec!(10000),
            grant_monthly: Some(dec!(3797)),
            pension_pct: dec!(5),
            employer_pension_pct: dec!(0),
            earnings_limit: Some(dec!(-1)),
            municipality: MunicipalityArgs::default(),
        };

        let input = request.to_input(&constants, copenhagen());

        assert_eq!(input.monthly_grant, dec!(3797));
        assert_eq!(input.employee_pension_rate, dec!(0.05));
        assert_eq!(input.annual_earnings_limit, Some(dec!(-1)));
    }

    // =========================================================================
    // Curve request tests
    // =========================================================================

    fn curve_request() -> CurveRequest {
        CurveRequest {
            pension_pct: dec!(4),
            employer_pension_pct: dec!(8),
            atp_monthly: None,
            hourly: false,
            max_gross: dec!(1200000),
            min_gross: dec!(0),
            step_monthly: dec!(0),
            points: 50,
            municipality: MunicipalityArgs::default(),
            adjustments: PayAdjustmentArgs::default(),
        }
    }

    #[test]
    fn curve_without_step_sweeps_points() {
        assert_eq!(
            curve_request().sweep(),
            GrossSweep::Points {
                max_gross: dec!(1200000),
                points: 50
            }
        );
    }

    #[test]
    fn curve_with_step_sweeps_monthly_steps() {
        let request = CurveRequest {
            min_gross: dec!(240000),
            step_monthly: dec!(5000),
            ..curve_request()
        };

        assert_eq!(
            request.sweep(),
            GrossSweep::Step {
                min_gross: dec!(240000),
                max_gross: dec!(1200000),
                step_monthly: dec!(5000),
            }
        );
    }

    #[test]
    fn curve_template_follows_hourly_flag() {
        let constants = constants();
        let request = CurveRequest {
            hourly: true,
            ..curve_request()
        };

        let template = request.to_template(&constants, copenhagen());

        assert_eq!(template.pay_basis, PayBasis::Hourly);
        assert_eq!(template.gross_annual, dec!(0));
        assert_eq!(template.atp_monthly, dec!(99));
    }

    // =========================================================================
    // Earnings-limit and periodisation request tests
    // =========================================================================

    #[test]
    fn parse_tier_accepts_known_names() {
        assert_eq!(parse_tier("grant"), Ok(EarningsLimitTier::ReceivingGrant));
        assert_eq!(parse_tier(" opted-out "), Ok(EarningsLimitTier::OptedOut));
        assert_eq!(parse_tier("not-enrolled"), Ok(EarningsLimitTier::NotEnrolled));
        assert!(parse_tier("holiday").is_err());
    }

    #[test]
    fn earnings_limit_defaults_to_twelve_grant_months() {
        let request = EarningsLimitRequest {
            months: vec![],
            youth: false,
            children: 0,
            gross_monthly: None,
            pension_pct: dec!(0),
        };

        assert_eq!(request.tiers(), vec![EarningsLimitTier::ReceivingGrant; 12]);
        assert_eq!(request.education_level(), EducationLevel::HigherEducation);
    }

    #[test]
    fn periodisation_grant_months_default_to_enrolled_months() {
        let constants = constants();
        let request = PeriodisationRequest {
            start_month: 8,
            end_month: 12,
            grant_months: None,
            grant_monthly: None,
            enrolled_gross_monthly: dec!(8000),
            pension_pct: dec!(0),
            outside_gross_total: dec!(175000),
            youth: false,
            children: 0,
        };

        let input = request.to_input(&constants);

        assert_eq!(input.grant_months, 5);
        assert_eq!(input.monthly_grant, dec!(7426));
        assert_eq!(input.outside_total_gross, dec!(175000));
    }
}
