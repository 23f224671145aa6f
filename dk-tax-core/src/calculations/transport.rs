//! Transport deduction (befordringsfradrag).
//!
//! Only the part of the daily round trip above the threshold (24 km) is
//! deductible. Kilometres up to the high threshold (120 km) earn the low-band
//! rate; kilometres beyond it earn the reduced rate. The daily amount is
//! multiplied by the number of working days.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use dk_tax_core::TransportRates;
//! use dk_tax_core::calculations::TransportDeduction;
//!
//! let rates = TransportRates {
//!     low_rate: dec!(1.98),
//!     high_rate: dec!(0.99),
//!     threshold_km: dec!(24),
//!     high_threshold_km: dec!(120),
//!     work_days: 218,
//! };
//!
//! let deduction = TransportDeduction::new(&rates);
//!
//! assert_eq!(deduction.annual(dec!(24)), dec!(0));
//! assert_eq!(deduction.annual(dec!(25)), dec!(431.64));
//! ```

use rust_decimal::Decimal;

use crate::TransportRates;

/// Calculator for the annual transport deduction.
#[derive(Debug, Clone)]
pub struct TransportDeduction<'a> {
    rates: &'a TransportRates,
}

impl<'a> TransportDeduction<'a> {
    pub fn new(rates: &'a TransportRates) -> Self {
        Self { rates }
    }

    /// Annual deduction for a daily round trip of `daily_km`, using the
    /// published number of working days.
    pub fn annual(
        &self,
        daily_km: Decimal,
    ) -> Decimal {
        self.annual_for_work_days(daily_km, self.rates.work_days)
    }

    /// Annual deduction for a daily round trip of `daily_km` over
    /// `work_days` working days.
    pub fn annual_for_work_days(
        &self,
        daily_km: Decimal,
        work_days: u32,
    ) -> Decimal {
        self.daily(daily_km) * Decimal::from(work_days)
    }

    /// Deduction for a single working day.
    fn daily(
        &self,
        daily_km: Decimal,
    ) -> Decimal {
        let threshold = self.rates.threshold_km;
        let high_threshold = self.rates.high_threshold_km;

        if daily_km <= threshold {
            return Decimal::ZERO;
        }
        if daily_km <= high_threshold {
            return (daily_km - threshold) * self.rates.low_rate;
        }

        let km_in_low_band = high_threshold - threshold;
        let km_in_high_band = daily_km - high_threshold;
        km_in_low_band * self.rates.low_rate + km_in_high_band * self.rates.high_rate
    }
}
