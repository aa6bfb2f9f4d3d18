//! Digit-only field handling and currency display.
//!
//! Numeric fields accept digits only: typed non-digits are rejected and a
//! paste containing anything else clears the field. Currency fields show
//! `$` plus grouped digits while unfocused and bare digits while focused.

use rust_decimal::Decimal;

use crate::calculations::common::round_to_cents;

/// Whether a typed character may enter a numeric field.
pub fn accepts_keystroke(c: char) -> bool {
    c.is_ascii_digit()
}

/// Returns pasted text unchanged if it is all digits, otherwise empty.
pub fn sanitize_pasted(text: &str) -> String {
    if text.chars().all(|c| c.is_ascii_digit()) {
        text.to_string()
    } else {
        String::new()
    }
}

/// Strips every character that is not an ASCII digit.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Parses a currency field as whole dollars.
///
/// Formatting characters are ignored. Returns `None` when no digits remain,
/// or (with a warning) when the number does not fit a [`Decimal`].
pub fn parse_currency(text: &str) -> Option<Decimal> {
    let digits = digits_only(text);
    if digits.is_empty() {
        return None;
    }
    digits.parse().map_or_else(
        |e| {
            tracing::warn!(input = %text, "discarding unparseable amount: {}", e);
            None
        },
        Some,
    )
}

/// Formats a currency field for unfocused display: `"100000"` → `"$100,000"`.
///
/// Leading zeros are dropped. Text without digits formats as empty.
pub fn format_currency_whole(text: &str) -> String {
    let digits = digits_only(text);
    if digits.is_empty() {
        return String::new();
    }
    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };
    format!("${}", group_thousands(significant))
}

/// Formats an amount as dollars and cents: `30.9` → `"$30.90"`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_to_cents(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Inserts `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// A currency input that reformats itself on focus changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyField {
    text: String,
    focused: bool,
}

impl CurrencyField {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the field currently displays.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Replaces the field content with user input.
    ///
    /// Focused fields keep raw digits; unfocused ones are formatted as
    /// currency straight away.
    pub fn input(&mut self, typed: &str) {
        let digits = digits_only(typed);
        self.text = if self.focused {
            digits
        } else {
            format_currency_whole(&digits)
        };
    }

    /// Switches to raw-digit display.
    pub fn focus(&mut self) {
        self.focused = true;
        self.text = digits_only(&self.text);
    }

    /// Switches back to `$`-formatted display.
    pub fn blur(&mut self) {
        self.focused = false;
        self.text = format_currency_whole(&self.text);
    }

    pub fn value(&self) -> Option<Decimal> {
        parse_currency(&self.text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
