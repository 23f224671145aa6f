//! Employee income tax calculation for salaried and hourly-paid workers.
//!
//! This module turns a gross annual income into a fully itemised breakdown
//! of Danish deductions and the resulting net income for one tax year.
//!
//! # Calculation Order
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Holiday pay: gross × 1 % (salaried) or 12.5 % (hourly) |
//! | 2    | Total cash = gross + holiday pay + other pay − pre-tax deductions; total gross adds non-cash benefits |
//! | 3    | Employee pension on base gross; employer pension is informational; ATP × 12 |
//! | 4    | Contribution basis = total gross − employee pension − ATP |
//! | 5    | Labour-market contribution (8 %) and income after contribution |
//! | 6    | Employment deduction and job deduction, each capped |
//! | 7    | Itemised deductions: transport + capped union fees |
//! | 8    | Base state tax on income above the personal allowance |
//! | 9    | Municipal tax on the base reduced by every deduction |
//! | 10   | Church tax on the base reduced by itemised deductions only |
//! | 11   | Mid, top and ultra-top brackets, throttled by the tax ceiling |
//! | 12   | Totals and net income |
//! | 13   | Net contribution of holiday pay (difference of two evaluations) |
//! | 14   | Effective rate = total deductions / total gross × 100 |
//!
//! Holiday pay is nominally paid once a year; it is spread evenly across
//! twelve months here, so monthly figures are annual averages.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use dk_tax_core::MunicipalityRates;
//! use dk_tax_core::calculations::{EmployeeTaxCalculator, EmployeeTaxInput};
//! # use dk_tax_core::{AtpRates, EarningsLimits, StudentGrantRates, TaxYearConstants, TransportRates};
//! # let constants = TaxYearConstants {
//! #     tax_year: 2026, am_rate: dec!(0.08), personal_allowance: dec!(54100),
//! #     base_tax_rate: dec!(0.1201), mid_bracket_threshold: dec!(641200),
//! #     mid_bracket_rate: dec!(0.075), top_bracket_threshold: dec!(777900),
//! #     top_bracket_rate: dec!(0.075), ultra_top_bracket_threshold: dec!(2592700),
//! #     ultra_top_bracket_rate: dec!(0.05), tax_ceiling: dec!(0.4457),
//! #     employment_deduction_rate: dec!(0.1275), employment_deduction_max: dec!(63300),
//! #     job_deduction_rate: dec!(0.045), job_deduction_max: dec!(3100),
//! #     holiday_supplement_rate: dec!(0.01), holiday_pay_rate: dec!(0.125),
//! #     union_fee_max: dec!(7000), grant_repayment_interest_rate: dec!(0.0975),
//! #     transport: TransportRates { low_rate: dec!(1.98), high_rate: dec!(0.99),
//! #         threshold_km: dec!(24), high_threshold_km: dec!(120), work_days: 218 },
//! #     atp: AtpRates { fulltime_monthly: dec!(99), monthly_27_36_hours: dec!(66),
//! #         monthly_18_26_hours: dec!(33), monthly_9_17_hours: dec!(0) },
//! #     student_grant: StudentGrantRates { away_from_home_monthly: dec!(7426),
//! #         living_at_home_base_monthly: dec!(1154), living_at_home_max_monthly: dec!(3797) },
//! #     earnings_limits: EarningsLimits { lowest_youth_monthly: dec!(15297),
//! #         lowest_higher_education_monthly: dec!(20749), middle_monthly: dec!(23598),
//! #         highest_monthly: dec!(45420), reduced_monthly: dec!(3921),
//! #         parent_bonus_per_child: dec!(34129) },
//! # };
//!
//! let input = EmployeeTaxInput {
//!     employee_pension_rate: dec!(0.04),
//!     employer_pension_rate: dec!(0.08),
//!     church_member: true,
//!     ..EmployeeTaxInput::new(dec!(480000), MunicipalityRates::new(dec!(23.39), dec!(0.80)))
//! };
//!
//! let calculator = EmployeeTaxCalculator::new(&constants);
//! let result = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(result.holiday_pay, dec!(4800));
//! assert_eq!(result.labour_market_contribution, dec!(37248));
//! assert_eq!(result.net_annual, result.total_cash - result.total_deductions - result.aftertax_deductions);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::brackets::{BracketRates, ProgressiveBrackets};
use crate::calculations::common::{MONTHS_PER_YEAR, min, monthly, positive_part};
use crate::calculations::transport::TransportDeduction;
use crate::calculations::validation::{
    CalculationError, ensure_fraction, ensure_municipality_rates, ensure_non_negative,
};
use crate::{MunicipalityRates, PayBasis, TaxYearConstants};

/// Input values for the employee calculation.
///
/// Money fields are annual DKK unless the name says monthly. Pension rates
/// are fractions; municipality rates are display percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTaxInput {
    /// Gross base income before any deduction.
    pub gross_annual: Decimal,

    /// Employee pension contribution, deducted from taxable income.
    pub employee_pension_rate: Decimal,

    /// Employer pension contribution on top of salary. Never taxed.
    pub employer_pension_rate: Decimal,

    pub municipality: MunicipalityRates,

    /// Member of the national church.
    pub church_member: bool,

    /// Whether the income is employment income. When false no labour-market
    /// contribution or employment deductions apply.
    pub has_employment_income: bool,

    /// Salaried or hourly; selects the holiday-pay rate.
    pub pay_basis: PayBasis,

    /// Extra cash compensation (allowances, broadband).
    pub other_pay_annual: Decimal,

    /// Non-cash benefits that are taxable but never paid out.
    pub taxable_benefits_annual: Decimal,

    /// Deducted from pay before tax (e.g. commuter card).
    pub pretax_deductions_annual: Decimal,

    /// Deducted from pay after tax (canteen, staff club).
    pub aftertax_deductions_annual: Decimal,

    /// Employee ATP contribution per month.
    pub atp_monthly: Decimal,

    /// Daily round-trip commute in km.
    pub transport_km: Decimal,

    /// Union and unemployment-fund fees per year.
    pub union_fees_annual: Decimal,
}

impl EmployeeTaxInput {
    /// A salaried employee with employment income and nothing else set.
    pub fn new(
        gross_annual: Decimal,
        municipality: MunicipalityRates,
    ) -> Self {
        Self {
            gross_annual,
            employee_pension_rate: Decimal::ZERO,
            employer_pension_rate: Decimal::ZERO,
            municipality,
            church_member: false,
            has_employment_income: true,
            pay_basis: PayBasis::Salaried,
            other_pay_annual: Decimal::ZERO,
            taxable_benefits_annual: Decimal::ZERO,
            pretax_deductions_annual: Decimal::ZERO,
            aftertax_deductions_annual: Decimal::ZERO,
            atp_monthly: Decimal::ZERO,
            transport_km: Decimal::ZERO,
            union_fees_annual: Decimal::ZERO,
        }
    }

    /// Validates every range documented on the fields.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CalculationError> {
        ensure_non_negative("gross_annual", self.gross_annual)?;
        ensure_fraction("employee_pension_rate", self.employee_pension_rate)?;
        ensure_fraction("employer_pension_rate", self.employer_pension_rate)?;
        ensure_municipality_rates(&self.municipality)?;
        ensure_non_negative("other_pay_annual", self.other_pay_annual)?;
        ensure_non_negative("taxable_benefits_annual", self.taxable_benefits_annual)?;
        ensure_non_negative("pretax_deductions_annual", self.pretax_deductions_annual)?;
        ensure_non_negative("aftertax_deductions_annual", self.aftertax_deductions_annual)?;
        ensure_non_negative("atp_monthly", self.atp_monthly)?;
        ensure_non_negative("transport_km", self.transport_km)?;
        ensure_non_negative("union_fees_annual", self.union_fees_annual)
    }
}

/// Itemised result of the employee calculation. All amounts are annual
/// unless the name says monthly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeTaxResult {
    pub gross_annual: Decimal,
    pub holiday_pay: Decimal,
    pub other_pay: Decimal,
    pub pretax_deductions: Decimal,
    pub aftertax_deductions: Decimal,
    pub taxable_benefits: Decimal,

    /// Cash actually paid before tax.
    pub total_cash: Decimal,
    /// Cash plus taxable non-cash benefits.
    pub total_gross: Decimal,

    pub employee_pension: Decimal,
    pub employer_pension: Decimal,
    pub total_pension: Decimal,
    pub atp_annual: Decimal,

    pub labour_market_contribution: Decimal,
    pub income_after_contribution: Decimal,

    pub employment_deduction: Decimal,
    pub job_deduction: Decimal,
    pub transport_deduction: Decimal,
    pub union_deduction: Decimal,
    /// Transport plus union deductions; reduces municipal and church bases only.
    pub itemized_deductions: Decimal,

    pub base_tax: Decimal,
    pub municipal_tax: Decimal,
    pub church_tax: Decimal,
    pub mid_bracket_tax: Decimal,
    pub top_bracket_tax: Decimal,
    pub ultra_top_bracket_tax: Decimal,

    pub effective_mid_rate: Decimal,
    pub effective_top_rate: Decimal,
    pub effective_ultra_top_rate: Decimal,

    pub total_income_tax: Decimal,
    /// Contribution, employee pension, income tax and ATP.
    pub total_deductions: Decimal,

    pub net_annual: Decimal,
    pub net_monthly: Decimal,

    /// Total deductions as a percentage of total gross; 0 when gross is 0.
    pub effective_tax_rate: Decimal,

    /// Net income attributable to holiday pay.
    pub net_holiday_pay: Decimal,
    pub net_holiday_pay_monthly: Decimal,
}

/// Calculator for employee net income.
///
/// Holds the constants for one tax year; every call is independent.
#[derive(Debug, Clone)]
pub struct EmployeeTaxCalculator<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> EmployeeTaxCalculator<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// Calculates the complete breakdown for `input`.
    ///
    /// The holiday-pay contribution is found by evaluating the same input a
    /// second time with holiday pay suppressed and subtracting the two net
    /// incomes.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] if a field is out of range.
    pub fn calculate(
        &self,
        input: &EmployeeTaxInput,
    ) -> Result<EmployeeTaxResult, CalculationError> {
        input.validate()?;

        let mut result = self.evaluate(input, true);

        let net_holiday_pay = if result.holiday_pay > Decimal::ZERO {
            let without_holiday_pay = self.evaluate(input, false);
            result.net_annual - without_holiday_pay.net_annual
        } else {
            Decimal::ZERO
        };
        result.net_holiday_pay = net_holiday_pay;
        result.net_holiday_pay_monthly = monthly(net_holiday_pay);

        debug!(
            gross_annual = %result.gross_annual,
            total_income_tax = %result.total_income_tax,
            net_annual = %result.net_annual,
            "employee tax calculated"
        );

        Ok(result)
    }

    /// One full evaluation. The holiday-pay contribution fields are left at zero.
    fn evaluate(
        &self,
        input: &EmployeeTaxInput,
        include_holiday_pay: bool,
    ) -> EmployeeTaxResult {
        // Step 1: Holiday pay
        let holiday_pay = if include_holiday_pay {
            self.holiday_pay(input.gross_annual, input.pay_basis)
        } else {
            Decimal::ZERO
        };

        // Step 2: Cash and taxable gross
        let total_cash = input.gross_annual + holiday_pay + input.other_pay_annual
            - input.pretax_deductions_annual;
        let total_gross = total_cash + input.taxable_benefits_annual;

        // Step 3: Pension and ATP
        let employee_pension = input.gross_annual * input.employee_pension_rate;
        let employer_pension = input.gross_annual * input.employer_pension_rate;
        let atp_annual = input.atp_monthly * MONTHS_PER_YEAR;

        // Steps 4-5: Labour-market contribution
        let basis = total_gross - employee_pension - atp_annual;
        let labour_market_contribution =
            self.labour_market_contribution(basis, input.has_employment_income);
        let income_after_contribution = basis - labour_market_contribution;

        // Step 6: Employment deductions
        let (employment_deduction, job_deduction) = if input.has_employment_income {
            (
                self.employment_deduction(income_after_contribution),
                self.job_deduction(income_after_contribution),
            )
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        // Step 7: Itemised deductions
        let transport_deduction =
            TransportDeduction::new(&self.constants.transport).annual(input.transport_km);
        let union_deduction = min(input.union_fees_annual, self.constants.union_fee_max);
        let itemized_deductions = transport_deduction + union_deduction;

        // Step 8: Base state tax
        let above_allowance = income_after_contribution - self.constants.personal_allowance;
        let base_tax = positive_part(above_allowance) * self.constants.base_tax_rate;

        // Step 9: Municipal tax
        let municipal_fraction = input.municipality.municipal_fraction();
        let municipal_base = positive_part(
            above_allowance - employment_deduction - job_deduction - itemized_deductions,
        );
        let municipal_tax = municipal_base * municipal_fraction;

        // Step 10: Church tax
        let church_tax = if input.church_member {
            positive_part(above_allowance - itemized_deductions)
                * input.municipality.church_fraction()
        } else {
            Decimal::ZERO
        };

        // Step 11: Progressive brackets
        let brackets = ProgressiveBrackets::new(self.constants);
        let rates: BracketRates = brackets.effective_rates(municipal_fraction);
        let bracket_taxes = brackets.taxes(income_after_contribution, &rates);

        // Step 12: Totals
        let total_income_tax = base_tax + municipal_tax + church_tax + bracket_taxes.total();
        let total_deductions =
            labour_market_contribution + employee_pension + total_income_tax + atp_annual;
        let net_annual = total_cash - total_deductions - input.aftertax_deductions_annual;

        // Step 14: Effective rate
        let effective_tax_rate = self.effective_tax_rate(total_deductions, total_gross);

        EmployeeTaxResult {
            gross_annual: input.gross_annual,
            holiday_pay,
            other_pay: input.other_pay_annual,
            pretax_deductions: input.pretax_deductions_annual,
            aftertax_deductions: input.aftertax_deductions_annual,
            taxable_benefits: input.taxable_benefits_annual,
            total_cash,
            total_gross,
            employee_pension,
            employer_pension,
            total_pension: employee_pension + employer_pension,
            atp_annual,
            labour_market_contribution,
            income_after_contribution,
            employment_deduction,
            job_deduction,
            transport_deduction,
            union_deduction,
            itemized_deductions,
            base_tax,
            municipal_tax,
            church_tax,
            mid_bracket_tax: bracket_taxes.mid,
            top_bracket_tax: bracket_taxes.top,
            ultra_top_bracket_tax: bracket_taxes.ultra_top,
            effective_mid_rate: rates.mid,
            effective_top_rate: rates.top,
            effective_ultra_top_rate: rates.ultra_top,
            total_income_tax,
            total_deductions,
            net_annual,
            net_monthly: monthly(net_annual),
            effective_tax_rate,
            net_holiday_pay: Decimal::ZERO,
            net_holiday_pay_monthly: Decimal::ZERO,
        }
    }

    /// Holiday pay (step 1) at the rate for the pay basis.
    fn holiday_pay(
        &self,
        gross_annual: Decimal,
        pay_basis: PayBasis,
    ) -> Decimal {
        gross_annual * pay_basis.holiday_rate(self.constants)
    }

    /// Labour-market contribution (step 5); zero for non-employment income.
    fn labour_market_contribution(
        &self,
        basis: Decimal,
        has_employment_income: bool,
    ) -> Decimal {
        if has_employment_income {
            basis * self.constants.am_rate
        } else {
            Decimal::ZERO
        }
    }

    /// Employment deduction (beskæftigelsesfradrag), capped.
    fn employment_deduction(
        &self,
        income_after_contribution: Decimal,
    ) -> Decimal {
        min(
            income_after_contribution * self.constants.employment_deduction_rate,
            self.constants.employment_deduction_max,
        )
    }

    /// Job deduction (jobfradrag), capped.
    fn job_deduction(
        &self,
        income_after_contribution: Decimal,
    ) -> Decimal {
        min(
            income_after_contribution * self.constants.job_deduction_rate,
            self.constants.job_deduction_max,
        )
    }

    /// Effective rate as a percentage; zero when there is no gross income.
    fn effective_tax_rate(
        &self,
        total_deductions: Decimal,
        total_gross: Decimal,
    ) -> Decimal {
        if total_gross > Decimal::ZERO {
            total_deductions / total_gross * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }
}
