use serde::{Deserialize, Serialize};

/// One candidate returned by the address autocomplete query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    pub id: String,
    pub full_address: String,
}
