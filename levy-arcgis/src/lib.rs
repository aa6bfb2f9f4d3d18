//! [`levy_core::PropertyLookup`] backed by an ArcGIS FeatureServer layer.

mod client;
mod factory;
mod query;
mod schema;

pub use client::ArcGisClient;
pub use factory::ArcGisLookupFactory;
pub use query::{WhereClause, escape_literal};
