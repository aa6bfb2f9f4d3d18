//! Rules for when the address field triggers a suggestion query.

/// Fewest characters the address field needs before suggestions are fetched.
pub const MIN_QUERY_LEN: usize = 3;

/// Returns the trimmed query if it is long enough to send to the service.
pub fn suggestion_query(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (trimmed.chars().count() >= MIN_QUERY_LEN).then_some(trimmed)
}
