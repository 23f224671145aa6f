mod earnings_limit_tier;
mod municipality;
mod pay_basis;
mod tax_year_constants;

pub use earnings_limit_tier::{EarningsLimitTier, EducationLevel};
pub use municipality::{Municipality, MunicipalityRates};
pub use pay_basis::PayBasis;
pub use tax_year_constants::{
    AtpRates, ConstantsError, EarningsLimits, StudentGrantRates, TaxYearConstants, TransportRates,
};
