use std::time::Duration;

use async_trait::async_trait;
use levy_core::lookup::LookupConfig;
use levy_core::{AddressSuggestion, LookupError, PropertyLookup, PropertyRecord};
use reqwest::{Client, Url};
use tracing::debug;

use crate::query::{PROPERTY_FIELDS, SUGGESTION_FIELDS, WhereClause};
use crate::schema::QueryResponse;

/// HTTP client for a FeatureServer layer's `query` endpoint.
pub struct ArcGisClient {
    endpoint: Url,
    municipality_filter: Option<String>,
    suggestion_limit: usize,
    client: Client,
}

impl ArcGisClient {
    /// Builds a client from lookup configuration.
    ///
    /// # Errors
    /// [`LookupError::Configuration`] when the endpoint is not a valid URL
    /// or the HTTP client cannot be built.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            LookupError::Configuration(format!("invalid endpoint '{}': {e}", config.endpoint))
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LookupError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            municipality_filter: config.municipality_filter.clone(),
            suggestion_limit: config.suggestion_limit,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn query(
        &self,
        clause: WhereClause,
        params: &[(&str, String)],
    ) -> Result<QueryResponse, LookupError> {
        let clause = clause.within(self.municipality_filter.as_deref());
        debug!(endpoint = %self.endpoint, clause = clause.as_str(), "querying feature service");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("where", clause.as_str())])
            .query(params)
            .query(&[("f", "json")])
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transport(format!("HTTP error! Status: {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        QueryResponse::parse(&body)
    }

    async fn property(
        &self,
        clause: WhereClause,
    ) -> Result<PropertyRecord, LookupError> {
        let params = [
            ("outFields", PROPERTY_FIELDS.to_string()),
            ("returnGeometry", "false".to_string()),
            ("outSR", "4326".to_string()),
        ];
        self.query(clause, &params).await?.into_property()
    }
}

#[async_trait]
impl PropertyLookup for ArcGisClient {
    async fn lookup_by_parcel_id(&self, parcel_id: &str) -> Result<PropertyRecord, LookupError> {
        self.property(WhereClause::parcel_id(parcel_id)).await
    }

    async fn lookup_by_address(&self, address: &str) -> Result<PropertyRecord, LookupError> {
        self.property(WhereClause::full_address(address)).await
    }

    async fn suggest_addresses(
        &self,
        query: &str,
    ) -> Result<Vec<AddressSuggestion>, LookupError> {
        let params = [
            ("outFields", SUGGESTION_FIELDS.to_string()),
            ("returnGeometry", "false".to_string()),
            ("orderByFields", "FULLADDRESS".to_string()),
            ("resultRecordCount", self.suggestion_limit.to_string()),
        ];
        let suggestions = self
            .query(WhereClause::address_contains(query), &params)
            .await?
            .into_suggestions();
        debug!(query, count = suggestions.len(), "address suggestions received");
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_endpoint() {
        let config = LookupConfig {
            endpoint: "not a url".to_string(),
            ..LookupConfig::default()
        };

        assert!(matches!(
            ArcGisClient::new(&config),
            Err(LookupError::Configuration(msg)) if msg.contains("not a url")
        ));
    }

    #[test]
    fn accepts_default_endpoint() {
        let client = ArcGisClient::new(&LookupConfig::default()).unwrap();

        assert_eq!(client.endpoint().host_str(), Some("services3.arcgis.com"));
    }
}
