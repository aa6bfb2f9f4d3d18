use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The computed share of the levy for one property.
///
/// Both values are non-negative; `tax_share` is rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub taxable_value: Decimal,
    pub tax_share: Decimal,
}
