//! Student income: grant (SU) plus part-time work, with the earnings-limit
//! (fribeløb) check.
//!
//! The grant is personal income but never carries labour-market
//! contribution. Work income always earns the hourly holiday-pay rate, and
//! the holiday pay counts towards own income for the earnings limit.
//!
//! When own income after contribution exceeds the annual limit, the excess
//! is repaid krone for krone, capped at the grant received, and interest is
//! charged on the repayment. Tax is then computed on the grant that is kept
//! plus the work income.
//!
//! # Calculation Order
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Annual limit defaults to 12 × the lowest higher-education monthly limit |
//! | 2    | Grant as gross = monthly grant × 12 |
//! | 3    | Work holiday pay, pension, contribution |
//! | 4    | Excess, repayment (capped at grant), interest, effective grant |
//! | 5    | Combined personal income = effective grant + work after contribution |
//! | 6    | Employment deductions on work income only |
//! | 7    | Base, municipal, church and mid-bracket taxes |
//! | 8    | Totals; net = grant + work + holiday pay − total deductions |
//! | 9    | Net contribution of holiday pay by difference |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::brackets::ProgressiveBrackets;
use crate::calculations::common::{MONTHS_PER_YEAR, min, monthly, positive_part};
use crate::calculations::validation::{
    CalculationError, ensure_fraction, ensure_municipality_rates, ensure_non_negative,
    ensure_within_max,
};
use crate::{MunicipalityRates, TaxYearConstants};

/// Input values for the student calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentIncomeInput {
    /// Grant paid per month before tax.
    pub monthly_grant: Decimal,

    /// Gross wages from work per month.
    pub monthly_work_gross: Decimal,

    /// Employee pension on work income, as a fraction.
    pub employee_pension_rate: Decimal,

    /// Employer pension on work income, as a fraction. Never taxed.
    pub employer_pension_rate: Decimal,

    pub municipality: MunicipalityRates,

    pub church_member: bool,

    /// Annual earnings limit. `None` uses the default; zero or negative
    /// overrides are accepted.
    pub annual_earnings_limit: Option<Decimal>,
}

impl StudentIncomeInput {
    pub fn new(
        monthly_grant: Decimal,
        monthly_work_gross: Decimal,
        municipality: MunicipalityRates,
    ) -> Self {
        Self {
            monthly_grant,
            monthly_work_gross,
            employee_pension_rate: Decimal::ZERO,
            employer_pension_rate: Decimal::ZERO,
            municipality,
            church_member: false,
            annual_earnings_limit: None,
        }
    }

    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CalculationError> {
        ensure_non_negative("monthly_grant", self.monthly_grant)?;
        ensure_non_negative("monthly_work_gross", self.monthly_work_gross)?;
        ensure_fraction("employee_pension_rate", self.employee_pension_rate)?;
        ensure_fraction("employer_pension_rate", self.employer_pension_rate)?;
        ensure_municipality_rates(&self.municipality)?;
        match self.annual_earnings_limit {
            Some(limit) => ensure_within_max("annual_earnings_limit", limit),
            None => Ok(()),
        }
    }
}

/// Itemised result of the student calculation. Amounts are annual unless
/// the name says monthly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentIncomeResult {
    pub monthly_grant: Decimal,
    /// Grant before any repayment.
    pub grant_annual_gross: Decimal,
    /// Grant kept after repayment.
    pub grant_annual: Decimal,
    pub grant_repayment: Decimal,
    pub grant_repayment_interest: Decimal,

    pub annual_earnings_limit: Decimal,
    pub earnings_limit_excess: Decimal,
    pub over_earnings_limit: bool,

    pub work_gross_monthly: Decimal,
    pub work_gross_annual: Decimal,
    pub work_holiday_pay: Decimal,
    pub work_employee_pension: Decimal,
    pub work_employer_pension: Decimal,
    pub work_total_pension: Decimal,
    pub work_labour_market_contribution: Decimal,
    pub work_after_contribution: Decimal,
    pub work_after_contribution_monthly: Decimal,

    /// Effective grant plus work income after contribution.
    pub total_personal_income: Decimal,

    pub employment_deduction: Decimal,
    pub job_deduction: Decimal,

    pub base_tax: Decimal,
    pub municipal_tax: Decimal,
    pub church_tax: Decimal,
    pub effective_mid_rate: Decimal,
    pub mid_bracket_tax: Decimal,

    pub total_income_tax: Decimal,
    /// Contribution, employee pension, income tax, repayment and interest.
    pub total_deductions: Decimal,

    pub net_annual: Decimal,
    pub net_monthly: Decimal,

    pub net_holiday_pay: Decimal,
    pub net_holiday_pay_monthly: Decimal,
}

/// Calculator for student net income.
#[derive(Debug, Clone)]
pub struct StudentIncomeCalculator<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> StudentIncomeCalculator<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// Calculates the complete student breakdown for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] if a field is out of range.
    pub fn calculate(
        &self,
        input: &StudentIncomeInput,
    ) -> Result<StudentIncomeResult, CalculationError> {
        input.validate()?;

        let mut result = self.evaluate(input, true);

        if result.over_earnings_limit {
            warn!(
                work_after_contribution = %result.work_after_contribution,
                annual_earnings_limit = %result.annual_earnings_limit,
                grant_repayment = %result.grant_repayment,
                "own income exceeds earnings limit; grant must be repaid"
            );
        }

        let net_holiday_pay = if result.work_holiday_pay > Decimal::ZERO {
            let without_holiday_pay = self.evaluate(input, false);
            result.net_annual - without_holiday_pay.net_annual
        } else {
            Decimal::ZERO
        };
        result.net_holiday_pay = net_holiday_pay;
        result.net_holiday_pay_monthly = monthly(net_holiday_pay);

        debug!(
            grant_annual_gross = %result.grant_annual_gross,
            work_gross_annual = %result.work_gross_annual,
            net_annual = %result.net_annual,
            "student income calculated"
        );

        Ok(result)
    }

    fn evaluate(
        &self,
        input: &StudentIncomeInput,
        include_holiday_pay: bool,
    ) -> StudentIncomeResult {
        let constants = self.constants;

        // Step 1: Earnings limit
        let annual_earnings_limit = input
            .annual_earnings_limit
            .unwrap_or_else(|| constants.default_annual_earnings_limit());

        // Step 2: Grant, never subject to contribution
        let grant_annual_gross = input.monthly_grant * MONTHS_PER_YEAR;

        // Step 3: Work side
        let work_gross_annual = input.monthly_work_gross * MONTHS_PER_YEAR;
        let work_holiday_pay = if include_holiday_pay {
            work_gross_annual * constants.holiday_pay_rate
        } else {
            Decimal::ZERO
        };
        let work_employee_pension = work_gross_annual * input.employee_pension_rate;
        let work_employer_pension = work_gross_annual * input.employer_pension_rate;
        let contribution_basis = work_gross_annual + work_holiday_pay - work_employee_pension;
        let work_labour_market_contribution = contribution_basis * constants.am_rate;
        let work_after_contribution = contribution_basis - work_labour_market_contribution;

        // Step 4: Earnings-limit check
        let earnings_limit_excess = positive_part(work_after_contribution - annual_earnings_limit);
        let grant_repayment = self.grant_repayment(earnings_limit_excess, grant_annual_gross);
        let grant_repayment_interest = grant_repayment * constants.grant_repayment_interest_rate;
        let grant_annual = grant_annual_gross - grant_repayment;

        // Step 5: Combined personal income
        let total_personal_income = grant_annual + work_after_contribution;

        // Step 6: Employment deductions on work income only
        let employment_deduction = min(
            work_after_contribution * constants.employment_deduction_rate,
            constants.employment_deduction_max,
        );
        let job_deduction = min(
            work_after_contribution * constants.job_deduction_rate,
            constants.job_deduction_max,
        );

        // Step 7: Taxes
        let above_allowance = positive_part(total_personal_income - constants.personal_allowance);
        let base_tax = above_allowance * constants.base_tax_rate;

        let municipal_fraction = input.municipality.municipal_fraction();
        let municipal_base = positive_part(
            total_personal_income
                - constants.personal_allowance
                - employment_deduction
                - job_deduction,
        );
        let municipal_tax = municipal_base * municipal_fraction;

        let church_tax = if input.church_member {
            above_allowance * input.municipality.church_fraction()
        } else {
            Decimal::ZERO
        };

        let brackets = ProgressiveBrackets::new(constants);
        let effective_mid_rate = brackets.effective_mid_rate(municipal_fraction);
        let mid_bracket_tax = brackets.mid_base(total_personal_income) * effective_mid_rate;

        // Step 8: Totals
        let total_income_tax = base_tax + municipal_tax + church_tax + mid_bracket_tax;
        let total_deductions = work_labour_market_contribution
            + work_employee_pension
            + total_income_tax
            + grant_repayment
            + grant_repayment_interest;
        let net_annual =
            grant_annual_gross + work_gross_annual + work_holiday_pay - total_deductions;

        StudentIncomeResult {
            monthly_grant: input.monthly_grant,
            grant_annual_gross,
            grant_annual,
            grant_repayment,
            grant_repayment_interest,
            annual_earnings_limit,
            earnings_limit_excess,
            over_earnings_limit: earnings_limit_excess > Decimal::ZERO,
            work_gross_monthly: input.monthly_work_gross,
            work_gross_annual,
            work_holiday_pay,
            work_employee_pension,
            work_employer_pension,
            work_total_pension: work_employee_pension + work_employer_pension,
            work_labour_market_contribution,
            work_after_contribution,
            work_after_contribution_monthly: monthly(work_after_contribution),
            total_personal_income,
            employment_deduction,
            job_deduction,
            base_tax,
            municipal_tax,
            church_tax,
            effective_mid_rate,
            mid_bracket_tax,
            total_income_tax,
            total_deductions,
            net_annual,
            net_monthly: monthly(net_annual),
            net_holiday_pay: Decimal::ZERO,
            net_holiday_pay_monthly: Decimal::ZERO,
        }
    }

    /// Krone-for-krone repayment, never more than the grant received.
    fn grant_repayment(
        &self,
        excess: Decimal,
        grant_annual_gross: Decimal,
    ) -> Decimal {
        min(excess, grant_annual_gross)
    }
}
