//! Fixtures shared by the calculation unit tests.

use rust_decimal_macros::dec;

use crate::models::{
    AtpRates, EarningsLimits, MunicipalityRates, StudentGrantRates, TaxYearConstants,
    TransportRates,
};

/// The published 2026 constants.
pub(crate) fn constants_2026() -> TaxYearConstants {
    TaxYearConstants {
        tax_year: 2026,
        am_rate: dec!(0.08),
        personal_allowance: dec!(54100),
        base_tax_rate: dec!(0.1201),
        mid_bracket_threshold: dec!(641200),
        mid_bracket_rate: dec!(0.075),
        top_bracket_threshold: dec!(777900),
        top_bracket_rate: dec!(0.075),
        ultra_top_bracket_threshold: dec!(2592700),
        ultra_top_bracket_rate: dec!(0.05),
        tax_ceiling: dec!(0.4457),
        employment_deduction_rate: dec!(0.1275),
        employment_deduction_max: dec!(63300),
        job_deduction_rate: dec!(0.045),
        job_deduction_max: dec!(3100),
        holiday_supplement_rate: dec!(0.01),
        holiday_pay_rate: dec!(0.125),
        union_fee_max: dec!(7000),
        grant_repayment_interest_rate: dec!(0.0975),
        transport: TransportRates {
            low_rate: dec!(1.98),
            high_rate: dec!(0.99),
            threshold_km: dec!(24),
            high_threshold_km: dec!(120),
            work_days: 218,
        },
        atp: AtpRates {
            fulltime_monthly: dec!(99),
            monthly_27_36_hours: dec!(66),
            monthly_18_26_hours: dec!(33),
            monthly_9_17_hours: dec!(0),
        },
        student_grant: StudentGrantRates {
            away_from_home_monthly: dec!(7426),
            living_at_home_base_monthly: dec!(1154),
            living_at_home_max_monthly: dec!(3797),
        },
        earnings_limits: EarningsLimits {
            lowest_youth_monthly: dec!(15297),
            lowest_higher_education_monthly: dec!(20749),
            middle_monthly: dec!(23598),
            highest_monthly: dec!(45420),
            reduced_monthly: dec!(3921),
            parent_bonus_per_child: dec!(34129),
        },
    }
}

/// København: 23.39 % municipal, 0.80 % church.
pub(crate) fn copenhagen() -> MunicipalityRates {
    MunicipalityRates::new(dec!(23.39), dec!(0.80))
}
