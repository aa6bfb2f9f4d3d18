//! Tax share for a fixed-millage special assessment.
//!
//! A mill is one dollar per $1,000 of taxable value, so the share owed is
//! `taxable_value * millage_rate / 1000`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use levy_core::calculations::{LevyCalculator, manual_taxable_value};
//!
//! let calculator = LevyCalculator::default();
//! let taxable = manual_taxable_value(dec!(100000), Some(dec!(25000)));
//! let result = calculator.calculate(taxable).unwrap();
//!
//! assert_eq!(result.taxable_value, dec!(75000));
//! assert_eq!(result.tax_share, dec!(46.35));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{floor_at_zero, round_to_cents};
use crate::models::TaxResult;

/// Mills levied for the PD Headquarters project (0.6180).
pub const DEFAULT_MILLAGE_RATE: Decimal = Decimal::from_parts(6180, 0, 0, false, 4);

const MILL_BASE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Taxable value times rate does not fit in a [`Decimal`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("taxable value {taxable_value} at {millage_rate} mills overflows")]
pub struct LevyOverflow {
    pub taxable_value: Decimal,
    pub millage_rate: Decimal,
}

/// `round((taxable_value * millage_rate) / 1000, 2)`, or `None` on overflow.
pub fn compute_tax_share(
    taxable_value: Decimal,
    millage_rate: Decimal,
) -> Option<Decimal> {
    taxable_value
        .checked_mul(millage_rate)
        .and_then(|levied| levied.checked_div(MILL_BASE))
        .map(round_to_cents)
}

/// Taxable value for manual entry: assessed minus exemption, never negative.
///
/// A missing exemption counts as zero.
pub fn manual_taxable_value(
    assessed_value: Decimal,
    exemption_value: Option<Decimal>,
) -> Decimal {
    floor_at_zero(assessed_value - exemption_value.unwrap_or(Decimal::ZERO))
}

/// Applies one configured millage rate to taxable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyCalculator {
    millage_rate: Decimal,
}

impl LevyCalculator {
    pub fn new(millage_rate: Decimal) -> Self {
        Self { millage_rate }
    }

    pub fn millage_rate(&self) -> Decimal {
        self.millage_rate
    }

    /// Produces the [`TaxResult`] for a taxable value.
    ///
    /// Negative inputs (which a lookup backend should already have
    /// clamped) are treated as zero.
    pub fn calculate(
        &self,
        taxable_value: Decimal,
    ) -> Result<TaxResult, LevyOverflow> {
        let taxable_value = floor_at_zero(taxable_value);
        let tax_share =
            compute_tax_share(taxable_value, self.millage_rate).ok_or(LevyOverflow {
                taxable_value,
                millage_rate: self.millage_rate,
            })?;
        Ok(TaxResult {
            taxable_value,
            tax_share,
        })
    }
}

impl Default for LevyCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_MILLAGE_RATE)
    }
}
