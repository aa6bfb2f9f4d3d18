pub mod factory;
pub mod provider;

pub use factory::{LookupConfig, LookupFactory, LookupRegistry};
pub use provider::{LookupError, PropertyLookup};
