use async_trait::async_trait;
use levy_core::lookup::{LookupConfig, LookupError, LookupFactory, PropertyLookup};

use crate::client::ArcGisClient;

/// [`LookupFactory`] for ArcGIS FeatureServer layers.
///
/// ```rust
/// use levy_core::lookup::LookupRegistry;
/// use levy_arcgis::ArcGisLookupFactory;
///
/// let registry = LookupRegistry::new().with(ArcGisLookupFactory);
/// assert_eq!(registry.backend_names(), vec!["arcgis"]);
/// ```
pub struct ArcGisLookupFactory;

#[async_trait]
impl LookupFactory for ArcGisLookupFactory {
    fn backend_name(&self) -> &'static str {
        "arcgis"
    }

    async fn create(&self, config: &LookupConfig) -> Result<Box<dyn PropertyLookup>, LookupError> {
        Ok(Box::new(ArcGisClient::new(config)?))
    }
}
