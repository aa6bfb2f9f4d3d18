//! End-to-end checks through the public API: form text in, tax share out.

use std::sync::Arc;

use async_trait::async_trait;
use levy_core::calculations::{LevyCalculator, compute_tax_share, manual_taxable_value};
use levy_core::input::resolve;
use levy_core::input::sanitize::format_currency;
use levy_core::{
    AddressSuggestion, EstimateError, InputError, LookupError, PropertyLookup, PropertyRecord,
    TaxEstimator, UserInput,
};
use pretty_assertions::assert_eq;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Serves a fixed set of parcels by id.
struct FixedParcels(Vec<PropertyRecord>);

#[async_trait]
impl PropertyLookup for FixedParcels {
    async fn lookup_by_parcel_id(&self, parcel_id: &str) -> Result<PropertyRecord, LookupError> {
        self.0
            .iter()
            .find(|r| r.id == parcel_id)
            .cloned()
            .ok_or(LookupError::NotFound)
    }
    async fn lookup_by_address(&self, address: &str) -> Result<PropertyRecord, LookupError> {
        self.0
            .iter()
            .find(|r| r.full_address.eq_ignore_ascii_case(address))
            .cloned()
            .ok_or(LookupError::NotFound)
    }
    async fn suggest_addresses(&self, query: &str) -> Result<Vec<AddressSuggestion>, LookupError> {
        let query = query.to_uppercase();
        Ok(self
            .0
            .iter()
            .filter(|r| r.full_address.contains(&query))
            .map(|r| AddressSuggestion {
                id: r.id.clone(),
                full_address: r.full_address.clone(),
            })
            .collect())
    }
}

fn estimator() -> TaxEstimator {
    let parcels = vec![PropertyRecord {
        id: "123456".to_string(),
        full_address: "4970 CITY HALL BLVD".to_string(),
        assessed_value: Some(dec!(90000)),
        taxable_value: dec!(50000),
        exemptions: Some(dec!(40000)),
        homestead: Some("Y".to_string()),
        hyperlink: None,
    }];
    TaxEstimator::new(Arc::new(FixedParcels(parcels)), LevyCalculator::default())
}

#[test]
fn share_matches_formula_when_exemption_within_assessed() {
    let mut assessed = Decimal::ZERO;
    while assessed <= dec!(500000) {
        let exemption = assessed / dec!(4);
        let taxable = manual_taxable_value(assessed, Some(exemption));
        assert_eq!(
            compute_tax_share(taxable, dec!(0.618)),
            Some(
                ((assessed - exemption) * dec!(0.618) / dec!(1000))
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            )
        );
        assessed += dec!(12345);
    }
}

#[test]
fn exemption_above_assessed_yields_zero() {
    for (assessed, exemption) in [(dec!(0), dec!(1)), (dec!(49999), dec!(50000)), (dec!(10), dec!(1000000))] {
        let result = LevyCalculator::default()
            .calculate(manual_taxable_value(assessed, Some(exemption)))
            .unwrap();
        assert_eq!(result.taxable_value, Decimal::ZERO);
        assert_eq!(result.tax_share, Decimal::ZERO);
    }
}

#[test]
fn all_fields_empty_is_invalid() {
    let input = UserInput::from_raw("", "", "", "");
    assert_eq!(resolve(&input), Err(InputError::NothingEntered));
}

#[test]
fn exemption_only_is_invalid() {
    let input = UserInput::from_raw("", "", "", "$25,000");
    assert_eq!(resolve(&input), Err(InputError::ExemptionWithoutAssessed));
}

#[tokio::test]
async fn manual_example_renders_expected_share() {
    let estimate = estimator()
        .estimate(&UserInput::from_raw("", "", "$100,000", "$25,000"))
        .await
        .unwrap();

    assert_eq!(estimate.result.taxable_value, dec!(75000));
    assert_eq!(format_currency(estimate.result.tax_share), "$46.35");
}

#[tokio::test]
async fn parcel_example_renders_expected_share() {
    let estimate = estimator()
        .estimate(&UserInput::from_raw("", "123456", "", ""))
        .await
        .unwrap();

    assert_eq!(format_currency(estimate.result.tax_share), "$30.90");
}

#[tokio::test]
async fn unknown_parcel_reports_no_property_found() {
    let err = estimator()
        .estimate(&UserInput::from_raw("", "000000", "", ""))
        .await
        .unwrap_err();

    assert_eq!(err, EstimateError::LookupNotFound);
    assert!(err.to_string().starts_with("No property found"));
}

#[tokio::test]
async fn suggestions_feed_address_lookup() {
    let estimator = estimator();

    let suggestions = estimator.suggest("city hall").await.unwrap();
    assert_eq!(suggestions.len(), 1);

    let chosen = &suggestions[0].full_address;
    let estimate = estimator
        .estimate(&UserInput::from_raw(chosen, "", "", ""))
        .await
        .unwrap();
    assert_eq!(estimate.result.tax_share, dec!(30.90));
}
