use std::sync::Arc;

use async_trait::async_trait;

use super::provider::{LookupError, PropertyLookup};

/// Published parcel layer for the county property appraiser.
pub const DEFAULT_ENDPOINT: &str = "https://services3.arcgis.com/icrWMv7eBkctFu1f/arcgis/rest/services/ParcelHosted/FeatureServer/0/query";

/// Backend-agnostic lookup configuration.
///
/// `backend` must match the [`LookupFactory::backend_name`] of a registered
/// factory. The remaining fields are interpreted by that factory.
///
/// | backend  | endpoint                                       |
/// |----------|------------------------------------------------|
/// | `arcgis` | FeatureServer layer `.../FeatureServer/0/query` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"arcgis"`).
    pub backend: String,
    pub endpoint: String,
    /// Extra `where` condition AND-ed into every query, e.g.
    /// `MUNICIPALITY = 'SARASOTA'`.
    pub municipality_filter: Option<String>,
    pub timeout_secs: u64,
    /// Cap on autocomplete candidates per query.
    pub suggestion_limit: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            backend: "arcgis".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            municipality_filter: None,
            timeout_secs: 15,
            suggestion_limit: 10,
        }
    }
}

/// One implementation per property-records backend.
#[async_trait]
pub trait LookupFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    async fn create(&self, config: &LookupConfig) -> Result<Box<dyn PropertyLookup>, LookupError>;
}

/// The backends compiled into a binary, in registration order.
#[derive(Default)]
pub struct LookupRegistry {
    factories: Vec<Box<dyn LookupFactory>>,
}

impl LookupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend. A later factory with the same name shadows earlier ones.
    pub fn with(mut self, factory: impl LookupFactory + 'static) -> Self {
        self.factories.insert(0, Box::new(factory));
        self
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.iter().map(|f| f.backend_name()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Builds the lookup named by `config.backend`.
    pub async fn connect(
        &self,
        config: &LookupConfig,
    ) -> Result<Arc<dyn PropertyLookup>, LookupError> {
        let Some(factory) = self.factories.iter().find(|f| f.backend_name() == config.backend) else {
            return Err(LookupError::Configuration(format!(
                "unknown backend '{}'; available: {}",
                config.backend,
                self.backend_names().join(", ")
            )));
        };
        factory.create(config).await.map(Arc::from)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::models::{AddressSuggestion, PropertyRecord};

    use super::*;

    /// Answers every parcel lookup with its backend name as the ID.
    struct NamedLookup(&'static str);

    #[async_trait]
    impl PropertyLookup for NamedLookup {
        async fn lookup_by_parcel_id(&self, _parcel_id: &str) -> Result<PropertyRecord, LookupError> {
            Ok(PropertyRecord {
                id: self.0.to_string(),
                full_address: String::new(),
                assessed_value: None,
                taxable_value: Default::default(),
                exemptions: None,
                homestead: None,
                hyperlink: None,
            })
        }
        async fn lookup_by_address(&self, _address: &str) -> Result<PropertyRecord, LookupError> {
            Err(LookupError::NotFound)
        }
        async fn suggest_addresses(
            &self,
            _query: &str,
        ) -> Result<Vec<AddressSuggestion>, LookupError> {
            Ok(Vec::new())
        }
    }

    /// `Ok` lookups tagged with `tag`; `Err` when `tag` is empty.
    struct Backend {
        name: &'static str,
        tag: &'static str,
    }

    #[async_trait]
    impl LookupFactory for Backend {
        fn backend_name(&self) -> &'static str {
            self.name
        }
        async fn create(
            &self,
            _config: &LookupConfig,
        ) -> Result<Box<dyn PropertyLookup>, LookupError> {
            if self.tag.is_empty() {
                return Err(LookupError::Configuration("endpoint rejected".to_string()));
            }
            Ok(Box::new(NamedLookup(self.tag)))
        }
    }

    fn config_for(backend: &str) -> LookupConfig {
        LookupConfig {
            backend: backend.to_string(),
            ..LookupConfig::default()
        }
    }

    async fn connected_tag(
        registry: &LookupRegistry,
        backend: &str,
    ) -> String {
        let lookup = registry.connect(&config_for(backend)).await.unwrap();
        lookup.lookup_by_parcel_id("1").await.unwrap().id
    }

    #[test]
    fn default_config_targets_arcgis_parcel_layer() {
        let cfg = LookupConfig::default();
        assert_eq!(cfg.backend, "arcgis");
        assert!(cfg.endpoint.ends_with("/FeatureServer/0/query"));
        assert_eq!(cfg.municipality_filter, None);
        assert_eq!(cfg.suggestion_limit, 10);
    }

    #[tokio::test]
    async fn connect_picks_backend_by_name() {
        let registry = LookupRegistry::new()
            .with(Backend { name: "arcgis", tag: "gis" })
            .with(Backend { name: "socrata", tag: "open-data" });

        assert_eq!(connected_tag(&registry, "arcgis").await, "gis");
        assert_eq!(connected_tag(&registry, "socrata").await, "open-data");
    }

    #[tokio::test]
    async fn later_registration_shadows_earlier() {
        let registry = LookupRegistry::new()
            .with(Backend { name: "arcgis", tag: "old" })
            .with(Backend { name: "arcgis", tag: "new" });

        assert_eq!(registry.backend_names(), vec!["arcgis"]);
        assert_eq!(connected_tag(&registry, "arcgis").await, "new");
    }

    #[tokio::test]
    async fn unknown_backend_lists_what_is_available() {
        let registry = LookupRegistry::new().with(Backend { name: "arcgis", tag: "gis" });

        let err = registry.connect(&config_for("socrata")).await.err();

        assert_eq!(
            err,
            Some(LookupError::Configuration(
                "unknown backend 'socrata'; available: arcgis".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn factory_errors_pass_through() {
        let registry = LookupRegistry::new().with(Backend { name: "arcgis", tag: "" });

        let err = registry.connect(&config_for("arcgis")).await.err();

        assert_eq!(err, Some(LookupError::Configuration("endpoint rejected".to_string())));
    }
}
