//! Danish income tax calculations for one tax year.
//!
//! Every calculator borrows a [`TaxYearConstants`](crate::TaxYearConstants)
//! table and is otherwise stateless, so a single table can serve any number
//! of calculations on any thread.

pub mod brackets;
pub mod common;
pub mod curve;
pub mod earnings_limit;
pub mod employee;
pub mod periodisation;
pub mod student;
pub mod transport;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use brackets::{BracketRates, BracketTaxes, ProgressiveBrackets};
pub use curve::{
    CurveBuilder, CurvePoint, DEFAULT_HOURS_STEP, GrossSweep, HoursCurvePoint, MAX_CURVE_POINTS,
    StudentCurvePoint,
};
pub use earnings_limit::EarningsLimitCalculator;
pub use employee::{EmployeeTaxCalculator, EmployeeTaxInput, EmployeeTaxResult};
pub use periodisation::{
    PeriodisationCalculator, PeriodisationComparison, PeriodisationInput, PeriodisationOutcome,
};
pub use student::{StudentIncomeCalculator, StudentIncomeInput, StudentIncomeResult};
pub use transport::TransportDeduction;
pub use validation::{CalculationError, MAX_AMOUNT, ensure_non_negative};
