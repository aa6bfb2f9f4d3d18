//! Wire types for FeatureServer JSON and their coercion into domain records.
//!
//! Attributes arrive loosely typed: ids may be strings or numbers, amounts
//! may be numbers, numeric strings or null. Coercion fails closed: a
//! feature without a usable `ID` and `FULLADDRESS` is skipped, while an
//! unreadable optional amount is dropped with a warning.

use std::str::FromStr;

use levy_core::{AddressSuggestion, LookupError, PropertyRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
    pub error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// ArcGIS reports query failures as a 200 response carrying this object.
#[derive(Debug, Deserialize)]
pub(crate) struct ServiceError {
    pub code: Option<i64>,
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

impl ServiceError {
    pub fn describe(&self) -> String {
        let mut text = format!(
            "service error {}: {}",
            self.code.map_or_else(|| "?".to_string(), |c| c.to_string()),
            self.message.as_deref().unwrap_or("no message")
        );
        if !self.details.is_empty() {
            text.push_str(&format!(" ({})", self.details.join("; ")));
        }
        text
    }
}

impl QueryResponse {
    pub fn parse(body: &str) -> Result<Self, LookupError> {
        let response: QueryResponse =
            serde_json::from_str(body).map_err(|e| LookupError::InvalidResponse(e.to_string()))?;
        match &response.error {
            Some(err) => Err(LookupError::Transport(err.describe())),
            None => Ok(response),
        }
    }

    /// First feature that coerces into a [`PropertyRecord`].
    pub fn into_property(self) -> Result<PropertyRecord, LookupError> {
        self.features
            .iter()
            .find_map(|f| property_from_attributes(&f.attributes))
            .ok_or(LookupError::NotFound)
    }

    pub fn into_suggestions(self) -> Vec<AddressSuggestion> {
        self.features
            .iter()
            .filter_map(|f| {
                Some(AddressSuggestion {
                    id: text_attr(&f.attributes, "ID")?,
                    full_address: text_attr(&f.attributes, "FULLADDRESS")?,
                })
            })
            .collect()
    }
}

fn property_from_attributes(attrs: &Map<String, Value>) -> Option<PropertyRecord> {
    let id = text_attr(attrs, "ID")?;
    let Some(full_address) = text_attr(attrs, "FULLADDRESS") else {
        warn!(%id, "skipping feature without FULLADDRESS");
        return None;
    };

    Some(PropertyRecord {
        taxable_value: amount_attr(attrs, "TXBL")
            .unwrap_or_default()
            .max(Decimal::ZERO),
        assessed_value: amount_attr(attrs, "ASSD"),
        exemptions: amount_attr(attrs, "EXEMPTIONS"),
        homestead: text_attr(attrs, "HOMESTEAD"),
        hyperlink: text_attr(attrs, "HYPERLINK"),
        id,
        full_address,
    })
}

/// Non-blank text, accepting numbers as their decimal rendering.
fn text_attr(
    attrs: &Map<String, Value>,
    key: &str,
) -> Option<String> {
    let text = match attrs.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn amount_attr(
    attrs: &Map<String, Value>,
    key: &str,
) -> Option<Decimal> {
    let raw = match attrs.get(key)? {
        Value::Null => return None,
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().to_string(),
        other => {
            warn!(key, value = %other, "ignoring non-numeric attribute");
            return None;
        }
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| warn!(key, %raw, "ignoring unparseable amount: {}", e))
        .ok()
}
