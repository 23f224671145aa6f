//! Progressive surtaxes and the tax ceiling (skatteloft).
//!
//! The combined state and municipal marginal rate may not exceed the
//! ceiling. The base marginal rate is the base tax rate plus the municipal
//! rate; on top of it the mid, top and ultra-top brackets are applied in that
//! order, and each one is reduced (never increased) to whatever budget the
//! ceiling leaves after the brackets before it.
//!
//! | Bracket   | Income slice (after labour-market contribution) |
//! |-----------|--------------------------------------------------|
//! | mid       | mid threshold .. top threshold                   |
//! | top       | top threshold .. ultra-top threshold             |
//! | ultra-top | above ultra-top threshold                        |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::TaxYearConstants;
use crate::calculations::common::{min, positive_part};

/// Bracket rates after the ceiling has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRates {
    pub mid: Decimal,
    pub top: Decimal,
    pub ultra_top: Decimal,
}

/// Tax due in each progressive bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTaxes {
    pub mid: Decimal,
    pub top: Decimal,
    pub ultra_top: Decimal,
}

impl BracketTaxes {
    pub fn total(&self) -> Decimal {
        self.mid + self.top + self.ultra_top
    }
}

/// Calculator for the ceiling-capped progressive brackets.
#[derive(Debug, Clone)]
pub struct ProgressiveBrackets<'a> {
    constants: &'a TaxYearConstants,
}

impl<'a> ProgressiveBrackets<'a> {
    pub fn new(constants: &'a TaxYearConstants) -> Self {
        Self { constants }
    }

    /// Base tax rate plus the municipal rate, before any surtax.
    pub fn base_marginal_rate(
        &self,
        municipal_fraction: Decimal,
    ) -> Decimal {
        self.constants.base_tax_rate + municipal_fraction
    }

    /// Effective rates for all three brackets, consuming the ceiling budget
    /// in mid, top, ultra-top order.
    pub fn effective_rates(
        &self,
        municipal_fraction: Decimal,
    ) -> BracketRates {
        let ceiling = self.constants.tax_ceiling;
        let mut consumed = self.base_marginal_rate(municipal_fraction);

        let mid = Self::capped_rate(self.constants.mid_bracket_rate, ceiling, consumed);
        consumed += mid;
        let top = Self::capped_rate(self.constants.top_bracket_rate, ceiling, consumed);
        consumed += top;
        let ultra_top = Self::capped_rate(self.constants.ultra_top_bracket_rate, ceiling, consumed);

        debug!(
            municipal_fraction = %municipal_fraction,
            mid = %mid,
            top = %top,
            ultra_top = %ultra_top,
            "effective bracket rates"
        );

        BracketRates {
            mid,
            top,
            ultra_top,
        }
    }

    /// Effective mid-bracket rate alone, for calculators that stop there.
    pub fn effective_mid_rate(
        &self,
        municipal_fraction: Decimal,
    ) -> Decimal {
        Self::capped_rate(
            self.constants.mid_bracket_rate,
            self.constants.tax_ceiling,
            self.base_marginal_rate(municipal_fraction),
        )
    }

    /// Income falling in the mid bracket.
    pub fn mid_base(
        &self,
        income: Decimal,
    ) -> Decimal {
        positive_part(
            min(income, self.constants.top_bracket_threshold)
                - self.constants.mid_bracket_threshold,
        )
    }

    /// Income falling in the top bracket.
    pub fn top_base(
        &self,
        income: Decimal,
    ) -> Decimal {
        positive_part(
            min(income, self.constants.ultra_top_bracket_threshold)
                - self.constants.top_bracket_threshold,
        )
    }

    /// Income falling in the ultra-top bracket.
    pub fn ultra_top_base(
        &self,
        income: Decimal,
    ) -> Decimal {
        positive_part(income - self.constants.ultra_top_bracket_threshold)
    }

    /// Tax due in each bracket for `income` at the given effective rates.
    pub fn taxes(
        &self,
        income: Decimal,
        rates: &BracketRates,
    ) -> BracketTaxes {
        BracketTaxes {
            mid: self.mid_base(income) * rates.mid,
            top: self.top_base(income) * rates.top,
            ultra_top: self.ultra_top_base(income) * rates.ultra_top,
        }
    }

    /// Reduces `nominal` so that `consumed + rate` stays within `ceiling`.
    fn capped_rate(
        nominal: Decimal,
        ceiling: Decimal,
        consumed: Decimal,
    ) -> Decimal {
        if consumed + nominal > ceiling {
            positive_part(ceiling - consumed)
        } else {
            nominal
        }
    }
}
