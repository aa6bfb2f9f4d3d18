//! `where` clauses for the FeatureServer `query` operation.

/// Attributes requested for a full property lookup.
pub(crate) const PROPERTY_FIELDS: &str = "ID,FULLADDRESS,ASSD,TXBL,EXEMPTIONS,HOMESTEAD,HYPERLINK";

/// Attributes requested for autocomplete.
pub(crate) const SUGGESTION_FIELDS: &str = "ID,FULLADDRESS";

const LIKE_ESCAPE: char = '\\';

/// Doubles single quotes so user text can sit inside a SQL-92 string literal.
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

/// A `where` expression, optionally narrowed to one municipality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause(String);

impl WhereClause {
    pub fn parcel_id(parcel_id: &str) -> Self {
        Self(format!("ID='{}'", escape_literal(parcel_id)))
    }

    /// Exact, case-insensitive match on the full situs address.
    pub fn full_address(address: &str) -> Self {
        Self(format!(
            "UPPER(FULLADDRESS)='{}'",
            escape_literal(&address.to_uppercase())
        ))
    }

    /// Substring match used by autocomplete.
    ///
    /// `%` and `_` in the fragment match literally.
    pub fn address_contains(fragment: &str) -> Self {
        let fragment = escape_literal(&fragment.to_uppercase());
        if !fragment.contains(['%', '_', LIKE_ESCAPE]) {
            return Self(format!("UPPER(FULLADDRESS) LIKE '%{fragment}%'"));
        }
        let mut pattern = String::with_capacity(fragment.len() + 4);
        for c in fragment.chars() {
            if matches!(c, '%' | '_' | LIKE_ESCAPE) {
                pattern.push(LIKE_ESCAPE);
            }
            pattern.push(c);
        }
        Self(format!(
            "UPPER(FULLADDRESS) LIKE '%{pattern}%' ESCAPE '{LIKE_ESCAPE}'"
        ))
    }

    pub fn within(
        self,
        municipality_filter: Option<&str>,
    ) -> Self {
        match municipality_filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(filter) => Self(format!("({}) AND ({})", self.0, filter)),
            None => self,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
