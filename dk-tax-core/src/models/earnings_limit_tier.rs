use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EarningsLimits;

/// A student's situation in a single month, which selects that month's
/// earnings limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarningsLimitTier {
    /// Receiving the grant this month.
    ReceivingGrant,
    /// Enrolled but opted out of the grant, on leave or in paid internship.
    OptedOut,
    /// Not enrolled, or no grant entitlement left.
    NotEnrolled,
}

impl EarningsLimitTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReceivingGrant => "grant",
            Self::OptedOut => "opted-out",
            Self::NotEnrolled => "not-enrolled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "grant" => Some(Self::ReceivingGrant),
            "opted-out" => Some(Self::OptedOut),
            "not-enrolled" => Some(Self::NotEnrolled),
            _ => None,
        }
    }

    /// Monthly limit for this tier at the given education level.
    pub fn monthly_limit(
        &self,
        level: EducationLevel,
        limits: &EarningsLimits,
    ) -> Decimal {
        match self {
            Self::ReceivingGrant => match level {
                EducationLevel::Youth => limits.lowest_youth_monthly,
                EducationLevel::HigherEducation => limits.lowest_higher_education_monthly,
            },
            Self::OptedOut => limits.middle_monthly,
            Self::NotEnrolled => limits.highest_monthly,
        }
    }
}

/// Education level; only affects the limit in grant months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EducationLevel {
    Youth,
    #[default]
    HigherEducation,
}
