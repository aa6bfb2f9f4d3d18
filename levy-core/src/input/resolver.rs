//! Chooses exactly one input mode from the four optional form fields.
//!
//! | Rule | Fields present                              | Outcome                    |
//! |------|---------------------------------------------|----------------------------|
//! | 1    | parcel and address                          | [`InputError::BothLookupFields`] |
//! | 2    | parcel or address, plus assessed or exemption | [`InputError::LookupWithManual`] |
//! | 3    | nothing                                     | [`InputError::NothingEntered`] |
//! | 4    | exemption only                              | [`InputError::ExemptionWithoutAssessed`] |
//! | 5    | parcel / address / assessed (+ exemption)   | the matching [`InputMode`] |
//!
//! Rules are checked in that order, so rule 1 wins regardless of the
//! manual fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserInput;

/// An input combination that cannot be estimated.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter either a Property Address OR a Parcel ID, not both.")]
    BothLookupFields,

    #[error("Please enter only a Parcel ID/Address OR the Assessed Value & Exemptions.")]
    LookupWithManual,

    #[error("Please enter a Property Address, a Parcel ID, or the Assessed Value.")]
    NothingEntered,

    #[error("Please enter an Assessed Value; Exemptions are optional.")]
    ExemptionWithoutAssessed,
}

/// The single way an estimate will obtain its taxable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    ParcelLookup(String),
    AddressLookup(String),
    Manual {
        assessed_value: Decimal,
        exemption_value: Option<Decimal>,
    },
}

/// Data-free tag for an [`InputMode`], carried on results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputModeKind {
    ParcelLookup,
    AddressLookup,
    Manual,
}

impl InputMode {
    pub fn kind(&self) -> InputModeKind {
        match self {
            Self::ParcelLookup(_) => InputModeKind::ParcelLookup,
            Self::AddressLookup(_) => InputModeKind::AddressLookup,
            Self::Manual { .. } => InputModeKind::Manual,
        }
    }

    /// Whether this mode needs the property-records service.
    pub fn needs_lookup(&self) -> bool {
        !matches!(self, Self::Manual { .. })
    }
}

impl InputModeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ParcelLookup => "parcel lookup",
            Self::AddressLookup => "address lookup",
            Self::Manual => "manual entry",
        }
    }
}

/// Resolves the form fields to one [`InputMode`].
pub fn resolve(input: &UserInput) -> Result<InputMode, InputError> {
    if input.parcel_id.is_some() && input.street_address.is_some() {
        return Err(InputError::BothLookupFields);
    }

    if input.has_lookup_field() && input.has_manual_field() {
        return Err(InputError::LookupWithManual);
    }

    if input.is_empty() {
        return Err(InputError::NothingEntered);
    }

    if let Some(parcel_id) = &input.parcel_id {
        return Ok(InputMode::ParcelLookup(parcel_id.clone()));
    }

    if let Some(address) = &input.street_address {
        return Ok(InputMode::AddressLookup(address.clone()));
    }

    match input.assessed_value {
        Some(assessed_value) => Ok(InputMode::Manual {
            assessed_value,
            exemption_value: input.exemption_value,
        }),
        None => Err(InputError::ExemptionWithoutAssessed),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input(
        address: Option<&str>,
        parcel: Option<&str>,
        assessed: Option<Decimal>,
        exemption: Option<Decimal>,
    ) -> UserInput {
        UserInput {
            street_address: address.map(str::to_string),
            parcel_id: parcel.map(str::to_string),
            assessed_value: assessed,
            exemption_value: exemption,
        }
    }

    // =========================================================================
    // invalid combinations
    // =========================================================================

    #[test]
    fn both_lookup_fields_rejected_regardless_of_manual_fields() {
        let manual = [
            (None, None),
            (Some(dec!(100000)), None),
            (None, Some(dec!(25000))),
            (Some(dec!(100000)), Some(dec!(25000))),
        ];
        for (assessed, exemption) in manual {
            let result = resolve(&input(Some("1 MAIN ST"), Some("123456"), assessed, exemption));
            assert_eq!(result, Err(InputError::BothLookupFields));
        }
    }

    #[test]
    fn parcel_with_assessed_value_rejected() {
        let result = resolve(&input(None, Some("123456"), Some(dec!(100000)), None));

        assert_eq!(result, Err(InputError::LookupWithManual));
    }

    #[test]
    fn address_with_exemption_rejected() {
        let result = resolve(&input(Some("1 MAIN ST"), None, None, Some(dec!(5000))));

        assert_eq!(result, Err(InputError::LookupWithManual));
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(resolve(&UserInput::default()), Err(InputError::NothingEntered));
    }

    #[test]
    fn exemption_without_assessed_rejected() {
        let result = resolve(&input(None, None, None, Some(dec!(25000))));

        assert_eq!(result, Err(InputError::ExemptionWithoutAssessed));
    }

    // =========================================================================
    // valid modes
    // =========================================================================

    #[test]
    fn parcel_only_selects_parcel_lookup() {
        let result = resolve(&input(None, Some("123456"), None, None));

        assert_eq!(result, Ok(InputMode::ParcelLookup("123456".to_string())));
    }

    #[test]
    fn address_only_selects_address_lookup() {
        let result = resolve(&input(Some("4970 CITY HALL BLVD"), None, None, None));

        assert_eq!(
            result,
            Ok(InputMode::AddressLookup("4970 CITY HALL BLVD".to_string()))
        );
    }

    #[test]
    fn assessed_only_selects_manual_without_exemption() {
        let result = resolve(&input(None, None, Some(dec!(100000)), None));

        assert_eq!(
            result,
            Ok(InputMode::Manual {
                assessed_value: dec!(100000),
                exemption_value: None,
            })
        );
    }

    #[test]
    fn assessed_and_exemption_select_manual() {
        let mode = resolve(&input(None, None, Some(dec!(100000)), Some(dec!(25000)))).unwrap();

        assert_eq!(mode.kind(), InputModeKind::Manual);
        assert!(!mode.needs_lookup());
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            InputError::BothLookupFields.to_string(),
            "Please enter either a Property Address OR a Parcel ID, not both."
        );
        assert_eq!(
            InputError::ExemptionWithoutAssessed.to_string(),
            "Please enter an Assessed Value; Exemptions are optional."
        );
    }
}
