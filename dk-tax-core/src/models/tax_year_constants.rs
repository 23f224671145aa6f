use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a constants table is internally inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstantsError {
    /// A rate that must be a fraction lies outside [0, 1].
    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    /// An amount or threshold is negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// Bracket or transport thresholds are not strictly increasing.
    #[error("{lower_field} ({lower}) must be below {upper_field} ({upper})")]
    ThresholdOrder {
        lower_field: &'static str,
        lower: Decimal,
        upper_field: &'static str,
        upper: Decimal,
    },
}

/// Per-kilometre rates for the transport deduction (befordringsfradrag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRates {
    /// DKK per km for the part of the round trip between the two thresholds.
    pub low_rate: Decimal,
    /// DKK per km for the part of the round trip above `high_threshold_km`.
    pub high_rate: Decimal,
    /// Round trips at or below this distance give no deduction.
    pub threshold_km: Decimal,
    /// Distance where the per-km rate drops to `high_rate`.
    pub high_threshold_km: Decimal,
    /// Working days per year used when no other count is supplied.
    pub work_days: u32,
}

/// Employee share of the ATP supplementary pension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtpRates {
    /// Monthly employee share for full-time employment.
    pub fulltime_monthly: Decimal,
    /// Monthly employee share at 27-36 hours per week.
    pub monthly_27_36_hours: Decimal,
    /// Monthly employee share at 18-26 hours per week.
    pub monthly_18_26_hours: Decimal,
    /// Monthly employee share at 9-17 hours per week.
    pub monthly_9_17_hours: Decimal,
}

/// Published student grant (SU) rates, per month before tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentGrantRates {
    pub away_from_home_monthly: Decimal,
    pub living_at_home_base_monthly: Decimal,
    pub living_at_home_max_monthly: Decimal,
}

/// Monthly earnings limits (fribeløb) while receiving a student grant.
///
/// All amounts are own income after the labour-market contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsLimits {
    /// Grant months, youth education.
    pub lowest_youth_monthly: Decimal,
    /// Grant months, higher education. This is the default limit.
    pub lowest_higher_education_monthly: Decimal,
    /// Enrolled but opted out of the grant, on leave or in paid internship.
    pub middle_monthly: Decimal,
    /// Not enrolled, or no remaining grant entitlement.
    pub highest_monthly: Decimal,
    /// Months with a handicap supplement.
    pub reduced_monthly: Decimal,
    /// Yearly increase per child under 18.
    pub parent_bonus_per_child: Decimal,
}

/// Rates and thresholds published for a single Danish tax year.
///
/// Every rate is a fraction (0.08 means 8 %). Bracket thresholds are
/// annual personal income after the labour-market contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConstants {
    pub tax_year: i32,

    /// Labour-market contribution (AM-bidrag).
    pub am_rate: Decimal,
    /// Personal allowance (personfradrag), annual.
    pub personal_allowance: Decimal,
    /// State base tax (bundskat).
    pub base_tax_rate: Decimal,

    pub mid_bracket_threshold: Decimal,
    pub mid_bracket_rate: Decimal,
    pub top_bracket_threshold: Decimal,
    pub top_bracket_rate: Decimal,
    pub ultra_top_bracket_threshold: Decimal,
    pub ultra_top_bracket_rate: Decimal,

    /// Maximum combined state and municipal marginal rate (skatteloft).
    pub tax_ceiling: Decimal,

    pub employment_deduction_rate: Decimal,
    pub employment_deduction_max: Decimal,
    pub job_deduction_rate: Decimal,
    pub job_deduction_max: Decimal,

    /// Ferietillæg for salaried employees.
    pub holiday_supplement_rate: Decimal,
    /// Feriepenge for hourly-paid workers.
    pub holiday_pay_rate: Decimal,

    /// Maximum deductible union and unemployment-fund fees per year.
    pub union_fee_max: Decimal,

    /// Interest charged on student grant repayments.
    pub grant_repayment_interest_rate: Decimal,

    pub transport: TransportRates,
    pub atp: AtpRates,
    pub student_grant: StudentGrantRates,
    pub earnings_limits: EarningsLimits,
}

impl TaxYearConstants {
    /// Default annual earnings limit: twelve months at the higher-education rate.
    pub fn default_annual_earnings_limit(&self) -> Decimal {
        self.earnings_limits.lowest_higher_education_monthly * Decimal::from(12)
    }

    /// Checks that every rate is a fraction, every amount is non-negative
    /// and that thresholds increase strictly.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConstantsError`] found.
    pub fn validate(&self) -> Result<(), ConstantsError> {
        let rates = [
            ("am_rate", self.am_rate),
            ("base_tax_rate", self.base_tax_rate),
            ("mid_bracket_rate", self.mid_bracket_rate),
            ("top_bracket_rate", self.top_bracket_rate),
            ("ultra_top_bracket_rate", self.ultra_top_bracket_rate),
            ("tax_ceiling", self.tax_ceiling),
            ("employment_deduction_rate", self.employment_deduction_rate),
            ("job_deduction_rate", self.job_deduction_rate),
            ("holiday_supplement_rate", self.holiday_supplement_rate),
            ("holiday_pay_rate", self.holiday_pay_rate),
            (
                "grant_repayment_interest_rate",
                self.grant_repayment_interest_rate,
            ),
        ];
        for (field, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ConstantsError::RateOutOfRange { field, value });
            }
        }

        let amounts = [
            ("personal_allowance", self.personal_allowance),
            ("mid_bracket_threshold", self.mid_bracket_threshold),
            ("employment_deduction_max", self.employment_deduction_max),
            ("job_deduction_max", self.job_deduction_max),
            ("union_fee_max", self.union_fee_max),
            ("transport.low_rate", self.transport.low_rate),
            ("transport.high_rate", self.transport.high_rate),
            ("transport.threshold_km", self.transport.threshold_km),
            ("atp.fulltime_monthly", self.atp.fulltime_monthly),
            ("atp.monthly_27_36_hours", self.atp.monthly_27_36_hours),
            ("atp.monthly_18_26_hours", self.atp.monthly_18_26_hours),
            ("atp.monthly_9_17_hours", self.atp.monthly_9_17_hours),
            (
                "student_grant.away_from_home_monthly",
                self.student_grant.away_from_home_monthly,
            ),
            (
                "earnings_limits.lowest_higher_education_monthly",
                self.earnings_limits.lowest_higher_education_monthly,
            ),
            (
                "earnings_limits.parent_bonus_per_child",
                self.earnings_limits.parent_bonus_per_child,
            ),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(ConstantsError::NegativeAmount { field, value });
            }
        }

        let ordered = [
            (
                ("mid_bracket_threshold", self.mid_bracket_threshold),
                ("top_bracket_threshold", self.top_bracket_threshold),
            ),
            (
                ("top_bracket_threshold", self.top_bracket_threshold),
                (
                    "ultra_top_bracket_threshold",
                    self.ultra_top_bracket_threshold,
                ),
            ),
            (
                ("transport.threshold_km", self.transport.threshold_km),
                (
                    "transport.high_threshold_km",
                    self.transport.high_threshold_km,
                ),
            ),
        ];
        for ((lower_field, lower), (upper_field, upper)) in ordered {
            if lower >= upper {
                return Err(ConstantsError::ThresholdOrder {
                    lower_field,
                    lower,
                    upper_field,
                    upper,
                });
            }
        }

        Ok(())
    }
}
