mod address_suggestion;
mod estimate;
mod property_record;
mod tax_result;
mod user_input;

pub use address_suggestion::AddressSuggestion;
pub use estimate::{Estimate, ManualSummary};
pub use property_record::PropertyRecord;
pub use tax_result::TaxResult;
pub use user_input::UserInput;
