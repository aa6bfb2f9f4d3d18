//! Levy arithmetic.
//!
//! Money is carried as [`rust_decimal::Decimal`] end to end and rounded to
//! cents only at the final tax-share step.

pub mod common;
pub mod levy;

pub use levy::{
    DEFAULT_MILLAGE_RATE, LevyCalculator, LevyOverflow, compute_tax_share, manual_taxable_value,
};
