use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::input::sanitize::parse_currency;

/// The four optional form fields, normalized.
///
/// Blank text becomes `None`. Which combinations are acceptable is decided
/// by [`crate::input::resolve`], not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub street_address: Option<String>,
    pub parcel_id: Option<String>,
    pub assessed_value: Option<Decimal>,
    pub exemption_value: Option<Decimal>,
}

impl UserInput {
    /// Builds input from raw field text as typed by the user.
    ///
    /// Address and parcel are trimmed. Currency fields keep only their
    /// digits, so `"$100,000"` and `"100000"` are equivalent.
    pub fn from_raw(
        street_address: &str,
        parcel_id: &str,
        assessed_value: &str,
        exemption_value: &str,
    ) -> Self {
        Self {
            street_address: non_blank(street_address),
            parcel_id: non_blank(parcel_id),
            assessed_value: parse_currency(assessed_value),
            exemption_value: parse_currency(exemption_value),
        }
    }

    pub fn has_lookup_field(&self) -> bool {
        self.street_address.is_some() || self.parcel_id.is_some()
    }

    pub fn has_manual_field(&self) -> bool {
        self.assessed_value.is_some() || self.exemption_value.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_lookup_field() && !self.has_manual_field()
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
