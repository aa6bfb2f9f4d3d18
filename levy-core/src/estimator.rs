//! Ties the resolver, the lookup backend and the calculator together.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::calculations::{LevyCalculator, LevyOverflow, manual_taxable_value};
use crate::input::autocomplete::suggestion_query;
use crate::input::{InputError, InputMode, InputModeKind, resolve};
use crate::lookup::{LookupError, PropertyLookup};
use crate::models::{
    AddressSuggestion, Estimate, ManualSummary, PropertyRecord, TaxResult, UserInput,
};

/// Why an estimate could not be produced. `Display` is the user message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error(transparent)]
    InvalidInputCombination(#[from] InputError),

    #[error("No property found. Try manual entry instead.")]
    LookupNotFound,

    /// Carries the underlying cause for logging; not shown to the user.
    #[error("An error occurred while fetching data.")]
    LookupTransport(String),

    #[error("The value entered is too large to estimate.")]
    AmountTooLarge(#[from] LevyOverflow),
}

impl From<LookupError> for EstimateError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound => EstimateError::LookupNotFound,
            LookupError::Transport(cause)
            | LookupError::InvalidResponse(cause)
            | LookupError::Configuration(cause) => EstimateError::LookupTransport(cause),
        }
    }
}

#[derive(Clone)]
pub struct TaxEstimator {
    lookup: Arc<dyn PropertyLookup>,
    calculator: LevyCalculator,
}

impl TaxEstimator {
    pub fn new(
        lookup: Arc<dyn PropertyLookup>,
        calculator: LevyCalculator,
    ) -> Self {
        Self { lookup, calculator }
    }

    pub fn calculator(&self) -> &LevyCalculator {
        &self.calculator
    }

    /// Resolves the input and runs the selected mode.
    ///
    /// Invalid combinations fail before any lookup is attempted.
    pub async fn estimate(
        &self,
        input: &UserInput,
    ) -> Result<Estimate, EstimateError> {
        let mode = resolve(input)?;
        self.run(mode).await
    }

    /// Runs an already-resolved input mode.
    pub async fn run(
        &self,
        mode: InputMode,
    ) -> Result<Estimate, EstimateError> {
        let kind = mode.kind();
        let estimate = match mode {
            InputMode::ParcelLookup(parcel_id) => {
                debug!(%parcel_id, "looking up parcel");
                let record = self.fetch(self.lookup.lookup_by_parcel_id(&parcel_id).await)?;
                self.estimate_for_record(kind, record)?
            }
            InputMode::AddressLookup(address) => {
                debug!(%address, "looking up address");
                let record = self.fetch(self.lookup.lookup_by_address(&address).await)?;
                self.estimate_for_record(kind, record)?
            }
            InputMode::Manual {
                assessed_value,
                exemption_value,
            } => {
                let taxable_value = manual_taxable_value(assessed_value, exemption_value);
                Estimate {
                    mode: kind,
                    result: self.calculate(taxable_value)?,
                    property: None,
                    manual: Some(ManualSummary {
                        assessed_value,
                        exemption_value: exemption_value.unwrap_or_default(),
                        taxable_value,
                    }),
                }
            }
        };

        info!(
            mode = kind.label(),
            taxable_value = %estimate.result.taxable_value,
            tax_share = %estimate.result.tax_share,
            "estimate complete"
        );
        Ok(estimate)
    }

    /// Address candidates for autocomplete.
    ///
    /// Queries shorter than [`crate::input::autocomplete::MIN_QUERY_LEN`]
    /// return an empty list without contacting the service.
    pub async fn suggest(
        &self,
        text: &str,
    ) -> Result<Vec<AddressSuggestion>, EstimateError> {
        let Some(query) = suggestion_query(text) else {
            return Ok(Vec::new());
        };
        self.lookup.suggest_addresses(query).await.map_err(|err| {
            error!(?err, query, "address suggestion failed");
            EstimateError::from(err)
        })
    }

    fn fetch(
        &self,
        result: Result<PropertyRecord, LookupError>,
    ) -> Result<PropertyRecord, EstimateError> {
        result.map_err(|err| {
            if err != LookupError::NotFound {
                error!(?err, "error fetching property data");
            }
            EstimateError::from(err)
        })
    }

    fn estimate_for_record(
        &self,
        kind: InputModeKind,
        record: PropertyRecord,
    ) -> Result<Estimate, EstimateError> {
        Ok(Estimate {
            mode: kind,
            result: self.calculate(record.taxable_value)?,
            property: Some(record),
            manual: None,
        })
    }

    fn calculate(
        &self,
        taxable_value: Decimal,
    ) -> Result<TaxResult, EstimateError> {
        self.calculator.calculate(taxable_value).map_err(|err| {
            warn!(%err, "tax share not computable");
            EstimateError::from(err)
        })
    }
}
