use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::input::InputModeKind;
use crate::models::{PropertyRecord, TaxResult};

/// The figures shown in the manual-entry summary region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSummary {
    pub assessed_value: Decimal,
    /// Exemption actually applied; zero when none was entered.
    pub exemption_value: Decimal,
    pub taxable_value: Decimal,
}

/// Outcome of a successful estimate.
///
/// Exactly one of `property` (lookup modes) or `manual` (manual entry)
/// is populated, matching `mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub mode: InputModeKind,
    pub result: TaxResult,
    pub property: Option<PropertyRecord>,
    pub manual: Option<ManualSummary>,
}
