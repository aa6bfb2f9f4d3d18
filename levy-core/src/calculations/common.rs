//! Rounding and clamping helpers shared by the levy calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, with midpoints rounded away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use levy_core::calculations::common::round_to_cents;
///
/// assert_eq!(round_to_cents(dec!(46.354)), dec!(46.35));
/// assert_eq!(round_to_cents(dec!(46.355)), dec!(46.36));
/// ```
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value so it is never below zero.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
