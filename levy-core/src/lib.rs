pub mod calculations;
pub mod estimator;
pub mod input;
pub mod lookup;
pub mod models;

pub use estimator::{EstimateError, TaxEstimator};
pub use input::{InputError, InputMode, InputModeKind};
pub use lookup::{LookupError, PropertyLookup};
pub use models::*;
