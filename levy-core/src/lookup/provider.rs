use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AddressSuggestion, PropertyRecord};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// No feature matched, or none carried the required attributes.
    #[error("No matching property")]
    NotFound,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Read-only access to county property records.
///
/// Implementations make no retries; each call reports failure once.
#[async_trait]
pub trait PropertyLookup: Send + Sync {
    async fn lookup_by_parcel_id(&self, parcel_id: &str) -> Result<PropertyRecord, LookupError>;

    async fn lookup_by_address(&self, address: &str) -> Result<PropertyRecord, LookupError>;

    /// Addresses containing `query`, for autocomplete. An empty list is a
    /// normal outcome, not [`LookupError::NotFound`].
    async fn suggest_addresses(&self, query: &str)
    -> Result<Vec<AddressSuggestion>, LookupError>;
}
