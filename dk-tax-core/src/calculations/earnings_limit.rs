//! Earnings-limit (fribeløb) planning helpers.
//!
//! The annual limit is the sum of twelve monthly limits, one per month,
//! chosen by the student's situation that month, plus a fixed bonus per
//! child. Own income (egenindkomst) is approximated from monthly gross
//! wages as `(gross + holiday pay − pension) × (1 − AM rate)`.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::validation::{CalculationError, ensure_fraction, ensure_non_negative};
use crate::{EarningsLimitTier, EducationLevel, TaxYearConstants};

/// Earnings-limit arithmetic for one tax year.
#[derive(Debug, Clone)]
pub struct EarningsLimitCalculator<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> EarningsLimitCalculator<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// Annual limit from one tier per calendar month plus the parent bonus.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] unless exactly twelve
    /// months are given.
    pub fn annual_limit(
        &self,
        months: &[EarningsLimitTier],
        level: EducationLevel,
        children: u32,
    ) -> Result<Decimal, CalculationError> {
        if months.len() != 12 {
            return Err(CalculationError::invalid(
                "months",
                Decimal::from(months.len()),
                "must list exactly 12 months",
            ));
        }

        let limits = &self.constants.earnings_limits;
        let monthly_sum: Decimal = months
            .iter()
            .map(|tier| tier.monthly_limit(level, limits))
            .sum();
        let annual = monthly_sum + self.parent_bonus(children);

        debug!(%annual, children, "annual earnings limit");

        Ok(annual)
    }

    /// Annual bonus for `children` children.
    pub fn parent_bonus(
        &self,
        children: u32,
    ) -> Decimal {
        self.constants.earnings_limits.parent_bonus_per_child * Decimal::from(children)
    }

    /// Approximate monthly own income from monthly gross wages.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a negative gross or a
    /// pension rate outside [0, 1].
    pub fn own_income_from_gross(
        &self,
        gross_monthly: Decimal,
        pension_rate: Decimal,
    ) -> Result<Decimal, CalculationError> {
        ensure_non_negative("gross_monthly", gross_monthly)?;
        ensure_fraction("pension_rate", pension_rate)?;

        let holiday_pay = gross_monthly * self.constants.holiday_pay_rate;
        let pension = gross_monthly * pension_rate;
        let contribution_basis = gross_monthly + holiday_pay - pension;
        Ok(contribution_basis * (Decimal::ONE - self.constants.am_rate))
    }

    /// Largest monthly gross whose own income stays at `target_own_income`.
    ///
    /// Returns zero when pension swallows the whole wage.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a negative target or a
    /// pension rate outside [0, 1].
    pub fn max_gross_for_own_income(
        &self,
        pension_rate: Decimal,
        target_own_income: Decimal,
    ) -> Result<Decimal, CalculationError> {
        ensure_fraction("pension_rate", pension_rate)?;
        ensure_non_negative("target_own_income", target_own_income)?;

        let denominator = Decimal::ONE + self.constants.holiday_pay_rate - pension_rate;
        if denominator <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok(target_own_income / ((Decimal::ONE - self.constants.am_rate) * denominator))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::round_half_up;
    use crate::calculations::test_support::constants_2026;

    // =========================================================================
    // annual_limit tests
    // =========================================================================

    #[test]
    fn twelve_grant_months_equal_default_limit() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);
        let months = [EarningsLimitTier::ReceivingGrant; 12];

        let result = calculator
            .annual_limit(&months, EducationLevel::HigherEducation, 0)
            .unwrap();

        assert_eq!(result, constants.default_annual_earnings_limit());
        assert_eq!(result, dec!(248988));
    }

    #[test]
    fn mixed_tiers_sum_their_monthly_limits() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);
        let mut months = [EarningsLimitTier::ReceivingGrant; 12];
        months[6] = EarningsLimitTier::NotEnrolled;
        months[7] = EarningsLimitTier::OptedOut;

        let result = calculator
            .annual_limit(&months, EducationLevel::HigherEducation, 0)
            .unwrap();

        // 10 × 20 749 + 45 420 + 23 598
        assert_eq!(result, dec!(276508));
    }

    #[test]
    fn youth_education_uses_lower_grant_month_limit() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);
        let months = [EarningsLimitTier::ReceivingGrant; 12];

        let result = calculator
            .annual_limit(&months, EducationLevel::Youth, 0)
            .unwrap();

        assert_eq!(result, dec!(183564));
    }

    #[test]
    fn children_add_parent_bonus() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);
        let months = [EarningsLimitTier::ReceivingGrant; 12];

        let result = calculator
            .annual_limit(&months, EducationLevel::HigherEducation, 2)
            .unwrap();

        assert_eq!(result, dec!(248988) + dec!(68258));
    }

    #[test]
    fn annual_limit_rejects_wrong_month_count() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);
        let months = [EarningsLimitTier::OptedOut; 11];

        let result = calculator.annual_limit(&months, EducationLevel::HigherEducation, 0);

        assert_eq!(
            result,
            Err(CalculationError::InvalidInput {
                field: "months",
                value: dec!(11),
                reason: "must list exactly 12 months",
            })
        );
    }

    // =========================================================================
    // own income tests
    // =========================================================================

    #[test]
    fn own_income_adds_holiday_pay_and_removes_contribution() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);

        let result = calculator.own_income_from_gross(dec!(10000), dec!(0)).unwrap();

        // (10 000 + 1 250) × 0.92
        assert_eq!(result, dec!(10350));
    }

    #[test]
    fn own_income_subtracts_pension() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);

        let result = calculator.own_income_from_gross(dec!(10000), dec!(0.05)).unwrap();

        // (10 000 + 1 250 − 500) × 0.92
        assert_eq!(result, dec!(9890));
    }

    #[test]
    fn max_gross_inverts_own_income() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);

        let gross = calculator
            .max_gross_for_own_income(dec!(0.05), dec!(20749))
            .unwrap();
        let own_income = calculator.own_income_from_gross(gross, dec!(0.05)).unwrap();

        assert_eq!(round_half_up(own_income), dec!(20749));
    }

    #[test]
    fn max_gross_is_zero_when_pension_takes_everything() {
        let mut constants = constants_2026();
        constants.holiday_pay_rate = dec!(0);
        let calculator = EarningsLimitCalculator::new(&constants);

        let result = calculator.max_gross_for_own_income(dec!(1), dec!(20749));

        assert_eq!(result, Ok(dec!(0)));
    }

    #[test]
    fn own_income_rejects_negative_gross() {
        let constants = constants_2026();
        let calculator = EarningsLimitCalculator::new(&constants);

        assert!(calculator.own_income_from_gross(dec!(-1), dec!(0)).is_err());
    }
}
