//! Plain-text rendering of the output regions.

use std::fmt::Write;

use levy_core::input::sanitize::{format_currency, format_currency_whole};
use levy_core::{ManualSummary, PropertyRecord, TaxResult};
use rust_decimal::Decimal;

use crate::state::{AppState, OutputRegions};

/// Whole-dollar amounts print without cents (`$75,000`), others with (`$1.50`).
pub fn format_amount(amount: Decimal) -> String {
    if amount.fract().is_zero() && !amount.is_sign_negative() {
        format_currency_whole(&amount.trunc().normalize().to_string())
    } else {
        format_currency(amount)
    }
}

pub fn render_property(record: &PropertyRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Property ID: {}", record.id);
    let _ = writeln!(out, "Address: {}", record.full_address);
    let _ = writeln!(
        out,
        "Assessed Value: {}",
        record.assessed_value.map_or_else(|| "N/A".to_string(), format_amount)
    );
    if let Some(exemptions) = record.exemptions {
        let _ = writeln!(out, "Exemptions: {}", format_amount(exemptions));
    }
    if let Some(homestead) = &record.homestead {
        let _ = writeln!(out, "Homestead: {homestead}");
    }
    let _ = writeln!(out, "Taxable Value: {}", format_amount(record.taxable_value));
    if let Some(link) = &record.hyperlink {
        let _ = writeln!(out, "View Property Details: {link}");
    }
    out
}

pub fn render_manual_summary(summary: &ManualSummary) -> String {
    format!(
        "Assessed Property Value: {}\nExemption Amount: {}\nTaxable Value: {}\n",
        format_amount(summary.assessed_value),
        format_amount(summary.exemption_value),
        format_amount(summary.taxable_value),
    )
}

pub fn render_tax_share(
    project_name: &str,
    result: &TaxResult,
) -> String {
    format!(
        "{} Share of Property Tax: {}\n",
        possessive(project_name),
        format_currency(result.tax_share)
    )
}

fn possessive(name: &str) -> String {
    if name.ends_with('s') || name.ends_with('S') {
        format!("{name}'")
    } else {
        format!("{name}'s")
    }
}

/// Renders all non-empty output regions, blank-line separated.
pub fn render_output(
    project_name: &str,
    output: &OutputRegions,
) -> String {
    let mut sections = Vec::new();
    if let Some(message) = &output.message {
        sections.push(format!("{message}\n"));
    }
    if let Some(record) = &output.property_details {
        sections.push(render_property(record));
    }
    if let Some(summary) = &output.manual_summary {
        sections.push(render_manual_summary(summary));
    }
    if let Some(result) = &output.tax_share {
        sections.push(render_tax_share(project_name, result));
    }
    sections.join("\n")
}

pub fn render_suggestions(state: &AppState) -> String {
    if !state.suggestions.is_open() {
        return String::new();
    }
    let mut out = String::new();
    for (i, candidate) in state.suggestions.candidates().iter().enumerate() {
        let _ = writeln!(out, "  {}. {} [{}]", i + 1, candidate.full_address, candidate.id);
    }
    out
}

/// Current field contents, for the session's `show` command.
pub fn render_form(state: &AppState) -> String {
    let form = &state.form;
    format!(
        "Property Address: {}\nParcel ID: {}\nAssessed Value: {}\nExemptions: {}\n",
        form.street_address,
        form.parcel_id,
        form.assessed_value.text(),
        form.exemption_value.text(),
    )
}
