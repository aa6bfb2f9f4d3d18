use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A parcel as reported by the property-records service.
///
/// Records are read-only and live only for one lookup/render cycle.
/// Lookup backends are responsible for coercing the service's loosely
/// typed attributes into this shape, and for refusing features that do
/// not carry an `id` and `full_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// County parcel identifier.
    pub id: String,
    pub full_address: String,
    /// Assessed (just) value, when the service reports one.
    pub assessed_value: Option<Decimal>,
    /// Taxable value after exemptions. Zero when the service omits it.
    pub taxable_value: Decimal,
    /// Total exemptions applied to the parcel.
    pub exemptions: Option<Decimal>,
    /// Homestead flag as reported (e.g. `"Y"`/`"N"`).
    pub homestead: Option<String>,
    /// Link to the property appraiser's detail page.
    pub hyperlink: Option<String>,
}
