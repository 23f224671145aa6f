//! Regular versus periodised earnings-limit assessment.
//!
//! A student who starts or finishes an education during the year may have
//! the limit assessed on the enrolled months only (periodisering). Under the
//! regular method every month counts: grant months at the grant-month limit,
//! enrolled months without grant at the middle limit, and months outside
//! education at the highest limit, with income from the whole year. The
//! periodised method counts only the enrolled months' limits and income,
//! and prorates the parent bonus by enrolled months.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{MONTHS_PER_YEAR, min, positive_part};
use crate::calculations::earnings_limit::EarningsLimitCalculator;
use crate::calculations::validation::{CalculationError, ensure_fraction, ensure_non_negative};
use crate::{EarningsLimitTier, EducationLevel, TaxYearConstants};

/// A mid-year start or finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodisationInput {
    /// First enrolled month, 1 = January.
    pub start_month: u32,
    /// Last enrolled month, inclusive.
    pub end_month: u32,
    /// Enrolled months with grant; the rest of the enrolled months count as
    /// opted out.
    pub grant_months: u32,
    pub monthly_grant: Decimal,
    /// Average gross wages per enrolled month.
    pub enrolled_monthly_gross: Decimal,
    pub enrolled_pension_rate: Decimal,
    /// Total gross wages for all months outside education. No pension.
    pub outside_total_gross: Decimal,
    pub education_level: EducationLevel,
    pub children: u32,
}

impl PeriodisationInput {
    pub fn enrolled_months(&self) -> u32 {
        self.end_month.saturating_sub(self.start_month) + 1
    }

    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for months out of order or
    /// out of range, a full-year enrolment, more grant months than enrolled
    /// months, or invalid amounts.
    pub fn validate(&self) -> Result<(), CalculationError> {
        if !(1..=12).contains(&self.start_month) {
            return Err(CalculationError::invalid(
                "start_month",
                Decimal::from(self.start_month),
                "must be a month between 1 and 12",
            ));
        }
        if self.end_month < self.start_month || self.end_month > 12 {
            return Err(CalculationError::invalid(
                "end_month",
                Decimal::from(self.end_month),
                "must be between the start month and 12",
            ));
        }
        if self.enrolled_months() >= 12 {
            return Err(CalculationError::invalid(
                "end_month",
                Decimal::from(self.end_month),
                "periodisation needs a start or finish during the year",
            ));
        }
        if self.grant_months > self.enrolled_months() {
            return Err(CalculationError::invalid(
                "grant_months",
                Decimal::from(self.grant_months),
                "must not exceed the enrolled months",
            ));
        }
        ensure_non_negative("monthly_grant", self.monthly_grant)?;
        ensure_non_negative("enrolled_monthly_gross", self.enrolled_monthly_gross)?;
        ensure_fraction("enrolled_pension_rate", self.enrolled_pension_rate)?;
        ensure_non_negative("outside_total_gross", self.outside_total_gross)
    }
}

/// The repayment outcome under one assessment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodisationOutcome {
    pub earnings_limit: Decimal,
    pub own_income: Decimal,
    pub excess: Decimal,
    pub repayment: Decimal,
    pub interest: Decimal,
    /// Repayment plus interest.
    pub total_loss: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodisationComparison {
    pub enrolled_months: u32,
    pub outside_months: u32,
    pub regular: PeriodisationOutcome,
    pub periodised: PeriodisationOutcome,
    /// Regular loss minus periodised loss; negative when periodisation costs more.
    pub periodisation_saving: Decimal,
}

/// Compares both assessment methods for one year.
#[derive(Debug, Clone)]
pub struct PeriodisationCalculator<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> PeriodisationCalculator<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] if the input is invalid.
    pub fn compare(
        &self,
        input: &PeriodisationInput,
    ) -> Result<PeriodisationComparison, CalculationError> {
        input.validate()?;

        let limits = &self.constants.earnings_limits;
        let enrolled_months = input.enrolled_months();
        let outside_months = 12 - enrolled_months;
        let opted_out_months = enrolled_months - input.grant_months;

        let grant_month_limit =
            EarningsLimitTier::ReceivingGrant.monthly_limit(input.education_level, limits);
        let enrolled_limit = grant_month_limit * Decimal::from(input.grant_months)
            + EarningsLimitTier::OptedOut.monthly_limit(input.education_level, limits)
                * Decimal::from(opted_out_months);
        let outside_limit = EarningsLimitTier::NotEnrolled
            .monthly_limit(input.education_level, limits)
            * Decimal::from(outside_months);

        let limit_calculator = EarningsLimitCalculator::new(self.constants);
        let parent_bonus = limit_calculator.parent_bonus(input.children);
        let enrolled_own_income = limit_calculator
            .own_income_from_gross(input.enrolled_monthly_gross, input.enrolled_pension_rate)?
            * Decimal::from(enrolled_months);
        let outside_own_income = input.outside_total_gross
            * (Decimal::ONE + self.constants.holiday_pay_rate)
            * (Decimal::ONE - self.constants.am_rate);

        let grant_received = input.monthly_grant * Decimal::from(input.grant_months);

        let regular = self.outcome(
            enrolled_limit + outside_limit + parent_bonus,
            enrolled_own_income + outside_own_income,
            grant_received,
        );
        let periodised = self.outcome(
            enrolled_limit + parent_bonus * Decimal::from(enrolled_months) / MONTHS_PER_YEAR,
            enrolled_own_income,
            grant_received,
        );
        let periodisation_saving = regular.total_loss - periodised.total_loss;

        debug!(
            enrolled_months,
            regular_loss = %regular.total_loss,
            periodised_loss = %periodised.total_loss,
            "periodisation compared"
        );

        Ok(PeriodisationComparison {
            enrolled_months,
            outside_months,
            regular,
            periodised,
            periodisation_saving,
        })
    }

    fn outcome(
        &self,
        earnings_limit: Decimal,
        own_income: Decimal,
        grant_received: Decimal,
    ) -> PeriodisationOutcome {
        let excess = positive_part(own_income - earnings_limit);
        let repayment = min(excess, grant_received);
        let interest = repayment * self.constants.grant_repayment_interest_rate;

        PeriodisationOutcome {
            earnings_limit,
            own_income,
            excess,
            repayment,
            interest,
            total_loss: repayment + interest,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::test_support::constants_2026;

    /// Started in August, grant every enrolled month, 8 000 a month at work.
    fn test_input() -> PeriodisationInput {
        PeriodisationInput {
            start_month: 8,
            end_month: 12,
            grant_months: 5,
            monthly_grant: dec!(7426),
            enrolled_monthly_gross: dec!(8000),
            enrolled_pension_rate: dec!(0),
            outside_total_gross: dec!(175000),
            education_level: EducationLevel::HigherEducation,
            children: 0,
        }
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_rejects_full_year_enrolment() {
        let input = PeriodisationInput {
            start_month: 1,
            end_month: 12,
            ..test_input()
        };

        assert!(matches!(
            input.validate(),
            Err(CalculationError::InvalidInput { field: "end_month", .. })
        ));
    }

    #[test]
    fn validate_rejects_end_before_start() {
        let input = PeriodisationInput {
            start_month: 8,
            end_month: 6,
            ..test_input()
        };

        assert!(input.validate().is_err());
    }

    #[test]
    fn validate_rejects_month_zero() {
        let input = PeriodisationInput {
            start_month: 0,
            ..test_input()
        };

        assert!(matches!(
            input.validate(),
            Err(CalculationError::InvalidInput { field: "start_month", .. })
        ));
    }

    #[test]
    fn validate_rejects_more_grant_months_than_enrolled() {
        let input = PeriodisationInput {
            grant_months: 6,
            ..test_input()
        };

        assert!(matches!(
            input.validate(),
            Err(CalculationError::InvalidInput { field: "grant_months", .. })
        ));
    }

    // =========================================================================
    // compare tests
    // =========================================================================

    #[test]
    fn compare_both_methods_under_the_limit() {
        let constants = constants_2026();
        let calculator = PeriodisationCalculator::new(&constants);

        let result = calculator.compare(&test_input()).unwrap();

        assert_eq!(result.enrolled_months, 5);
        assert_eq!(result.outside_months, 7);
        // 5 × 20 749 + 7 × 45 420
        assert_eq!(result.regular.earnings_limit, dec!(421685));
        // 5 × 8 280 + 175 000 × 1.125 × 0.92
        assert_eq!(result.regular.own_income, dec!(222525));
        assert_eq!(result.periodised.earnings_limit, dec!(103745));
        assert_eq!(result.periodised.own_income, dec!(41400));
        assert_eq!(result.regular.total_loss, dec!(0));
        assert_eq!(result.periodised.total_loss, dec!(0));
        assert_eq!(result.periodisation_saving, dec!(0));
    }

    #[test]
    fn compare_periodisation_saves_high_outside_income() {
        let constants = constants_2026();
        let calculator = PeriodisationCalculator::new(&constants);
        let input = PeriodisationInput {
            outside_total_gross: dec!(400000),
            ..test_input()
        };

        let result = calculator.compare(&input).unwrap();

        assert_eq!(result.regular.own_income, dec!(455400));
        assert_eq!(result.regular.excess, dec!(33715));
        assert_eq!(result.regular.repayment, dec!(33715));
        assert_eq!(result.regular.interest, dec!(3287.2125));
        assert_eq!(result.periodised.total_loss, dec!(0));
        assert_eq!(result.periodisation_saving, dec!(37002.2125));
    }

    #[test]
    fn compare_periodisation_can_cost_more() {
        let constants = constants_2026();
        let calculator = PeriodisationCalculator::new(&constants);
        let input = PeriodisationInput {
            enrolled_monthly_gross: dec!(25000),
            outside_total_gross: dec!(0),
            ..test_input()
        };

        let result = calculator.compare(&input).unwrap();

        assert_eq!(result.regular.total_loss, dec!(0));
        // 5 × 25 875 − 103 745
        assert_eq!(result.periodised.excess, dec!(25630));
        assert_eq!(result.periodised.total_loss, dec!(28128.925));
        assert_eq!(result.periodisation_saving, dec!(-28128.925));
    }

    #[test]
    fn compare_repayment_capped_at_grant_received() {
        let constants = constants_2026();
        let calculator = PeriodisationCalculator::new(&constants);
        let input = PeriodisationInput {
            enrolled_monthly_gross: dec!(60000),
            ..test_input()
        };

        let result = calculator.compare(&input).unwrap();

        assert_eq!(result.periodised.repayment, dec!(37130));
    }

    #[test]
    fn compare_prorates_parent_bonus_for_periodised_method() {
        let constants = constants_2026();
        let calculator = PeriodisationCalculator::new(&constants);
        let input = PeriodisationInput {
            start_month: 1,
            end_month: 6,
            grant_months: 4,
            children: 1,
            ..test_input()
        };

        let result = calculator.compare(&input).unwrap();

        // 4 × 20 749 + 2 × 23 598 + 6 × 45 420 + 34 129
        assert_eq!(result.regular.earnings_limit, dec!(436841));
        // 4 × 20 749 + 2 × 23 598 + 34 129 × 6 / 12
        assert_eq!(result.periodised.earnings_limit, dec!(147256.5));
    }
}
