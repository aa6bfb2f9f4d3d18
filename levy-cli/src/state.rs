//! Application state for the estimator front end.
//!
//! Everything the user sees lives in one [`AppState`]: the four form
//! fields, the output regions and the address suggestion list. Completed
//! operations replace the output regions in one step, and only when they
//! carry the latest [`RequestTicket`], so a slow response can never
//! overwrite a newer one.

use levy_core::input::resolve;
use levy_core::input::sanitize::{CurrencyField, sanitize_pasted};
use levy_core::{
    AddressSuggestion, Estimate, EstimateError, InputMode, ManualSummary, PropertyRecord,
    TaxResult, UserInput,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Generation number captured when an operation is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn number(&self) -> u64 {
        self.0
    }
}

/// The four input fields, as displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub street_address: String,
    pub parcel_id: String,
    pub assessed_value: CurrencyField,
    pub exemption_value: CurrencyField,
}

impl FormFields {
    pub fn set_street_address(&mut self, text: &str) {
        self.street_address = text.trim().to_string();
    }

    /// Parcel IDs are numeric; pasted text containing anything else
    /// clears the field.
    pub fn set_parcel_id(&mut self, text: &str) {
        let text = text.trim();
        self.parcel_id = sanitize_pasted(text);
        if self.parcel_id.is_empty() && !text.is_empty() {
            warn!(input = %text, "parcel id must be digits only; field cleared");
        }
    }

    pub fn set_assessed_value(&mut self, text: &str) {
        type_into(&mut self.assessed_value, text);
    }

    pub fn set_exemption_value(&mut self, text: &str) {
        type_into(&mut self.exemption_value, text);
    }

    pub fn to_input(&self) -> UserInput {
        UserInput::from_raw(
            &self.street_address,
            &self.parcel_id,
            self.assessed_value.text(),
            self.exemption_value.text(),
        )
    }

    pub fn clear(&mut self) {
        self.street_address.clear();
        self.parcel_id.clear();
        self.assessed_value.clear();
        self.exemption_value.clear();
    }
}

/// Focus, type, blur: leaves the field `$`-formatted.
fn type_into(
    field: &mut CurrencyField,
    text: &str,
) {
    field.focus();
    field.input(text);
    field.blur();
}

/// What the last completed trigger produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRegions {
    pub property_details: Option<PropertyRecord>,
    pub tax_share: Option<TaxResult>,
    pub manual_summary: Option<ManualSummary>,
    pub message: Option<String>,
}

impl OutputRegions {
    fn from_outcome(outcome: Result<Estimate, EstimateError>) -> Self {
        match outcome {
            Ok(estimate) => Self {
                property_details: estimate.property,
                tax_share: Some(estimate.result),
                manual_summary: estimate.manual,
                message: None,
            },
            Err(err) => Self {
                message: Some(err.to_string()),
                ..Self::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no address suggestions are open")]
    Closed,

    #[error("no suggestion numbered {0}")]
    OutOfRange(usize),
}

/// The address autocomplete dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionList {
    candidates: Vec<AddressSuggestion>,
    open: bool,
}

impl SuggestionList {
    /// Replaces the candidates; the list opens only if there are any.
    pub fn show(&mut self, candidates: Vec<AddressSuggestion>) {
        self.open = !candidates.is_empty();
        self.candidates = candidates;
    }

    pub fn dismiss(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn candidates(&self) -> &[AddressSuggestion] {
        &self.candidates
    }

    /// Picks a candidate by zero-based index and closes the list.
    ///
    /// An invalid index leaves the list open.
    pub fn select(&mut self, index: usize) -> Result<AddressSuggestion, SelectionError> {
        if !self.open {
            return Err(SelectionError::Closed);
        }
        let chosen = self
            .candidates
            .get(index)
            .cloned()
            .ok_or(SelectionError::OutOfRange(index + 1))?;
        self.open = false;
        Ok(chosen)
    }
}

/// Result of pressing the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Input was invalid; the message is already in the output regions.
    Rejected,
    /// Input resolved; run `mode` and hand the outcome back with `ticket`.
    Pending(RequestTicket, InputMode),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub form: FormFields,
    pub output: OutputRegions,
    pub suggestions: SuggestionList,
    latest_request: u64,
    latest_suggestion: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh state with `form` already filled in.
    pub fn with_form(form: FormFields) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Handles the trigger action.
    ///
    /// Output regions are cleared and a new ticket issued. Invalid input is
    /// reported straight away and the fields are cleared; valid input is
    /// returned for the caller to run.
    pub fn submit(&mut self) -> Submission {
        let ticket = self.begin_request();
        self.output = OutputRegions::default();

        match resolve(&self.form.to_input()) {
            Ok(mode) => Submission::Pending(ticket, mode),
            Err(err) => {
                debug!(ticket = ticket.0, %err, "input rejected");
                self.output.message = Some(err.to_string());
                self.form.clear();
                Submission::Rejected
            }
        }
    }

    /// Applies a finished estimate if `ticket` is still the latest.
    ///
    /// Returns `false`, changing nothing, for stale tickets. Applied
    /// outcomes, success or failure, clear the form.
    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Estimate, EstimateError>,
    ) -> bool {
        if ticket.0 != self.latest_request {
            debug!(ticket = ticket.0, latest = self.latest_request, "discarding stale estimate");
            return false;
        }
        self.output = OutputRegions::from_outcome(outcome);
        self.form.clear();
        true
    }

    pub fn begin_suggestion(&mut self) -> RequestTicket {
        self.latest_suggestion += 1;
        RequestTicket(self.latest_suggestion)
    }

    pub fn is_current_suggestion(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest_suggestion
    }

    /// Shows candidates from the latest suggestion query; stale lists are dropped.
    pub fn apply_suggestions(
        &mut self,
        ticket: RequestTicket,
        candidates: Vec<AddressSuggestion>,
    ) -> bool {
        if !self.is_current_suggestion(ticket) {
            debug!(ticket = ticket.0, latest = self.latest_suggestion, "discarding stale suggestions");
            return false;
        }
        self.suggestions.show(candidates);
        true
    }

    /// Copies the chosen candidate into the address field.
    pub fn select_suggestion(&mut self, index: usize) -> Result<AddressSuggestion, SelectionError> {
        let chosen = self.suggestions.select(index)?;
        self.form.set_street_address(&chosen.full_address);
        // Any query still in flight belongs to the text that was just replaced.
        self.latest_suggestion += 1;
        Ok(chosen)
    }

    fn begin_request(&mut self) -> RequestTicket {
        self.latest_request += 1;
        RequestTicket(self.latest_request)
    }
}

#[cfg(test)]
mod tests {
    use levy_core::{InputError, InputModeKind};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn manual_estimate() -> Estimate {
        Estimate {
            mode: InputModeKind::Manual,
            result: TaxResult {
                taxable_value: dec!(75000),
                tax_share: dec!(46.35),
            },
            property: None,
            manual: Some(ManualSummary {
                assessed_value: dec!(100000),
                exemption_value: dec!(25000),
                taxable_value: dec!(75000),
            }),
        }
    }

    fn suggestion(id: &str, address: &str) -> AddressSuggestion {
        AddressSuggestion {
            id: id.to_string(),
            full_address: address.to_string(),
        }
    }

    // =========================================================================
    // form fields
    // =========================================================================

    #[test]
    fn currency_fields_display_formatted() {
        let mut form = FormFields::default();
        form.set_assessed_value("100000");

        assert_eq!(form.assessed_value.text(), "$100,000");
        assert_eq!(form.to_input().assessed_value, Some(dec!(100000)));
    }

    #[test]
    fn non_numeric_parcel_paste_is_cleared() {
        let mut form = FormFields::default();
        form.set_parcel_id("09540A");

        assert_eq!(form.parcel_id, "");
    }

    // =========================================================================
    // submit / apply
    // =========================================================================

    #[test]
    fn invalid_submission_reports_and_clears_fields() {
        let mut state = AppState::new();
        state.form.set_parcel_id("123456");
        state.form.set_street_address("1 MAIN ST");

        assert_eq!(state.submit(), Submission::Rejected);
        assert_eq!(
            state.output.message.as_deref(),
            Some(InputError::BothLookupFields.to_string().as_str())
        );
        assert_eq!(state.form, FormFields::default());
    }

    #[test]
    fn valid_submission_returns_mode_and_keeps_fields_until_applied() {
        let mut state = AppState::new();
        state.form.set_parcel_id("123456");

        match state.submit() {
            Submission::Pending(_, mode) => {
                assert_eq!(mode, InputMode::ParcelLookup("123456".to_string()))
            }
            other => panic!("expected pending submission, got {other:?}"),
        }
        assert_eq!(state.form.parcel_id, "123456");
    }

    #[test]
    fn apply_fills_regions_and_clears_form() {
        let mut state = AppState::new();
        state.form.set_assessed_value("100000");
        state.form.set_exemption_value("25000");
        let Submission::Pending(ticket, _) = state.submit() else {
            panic!("manual input should resolve");
        };

        assert!(state.apply(ticket, Ok(manual_estimate())));
        assert_eq!(state.output.tax_share.map(|r| r.tax_share), Some(dec!(46.35)));
        assert!(state.output.manual_summary.is_some());
        assert_eq!(state.form, FormFields::default());
    }

    #[test]
    fn failed_lookup_reports_message_and_clears_form() {
        let mut state = AppState::new();
        state.form.set_parcel_id("999");
        let Submission::Pending(ticket, _) = state.submit() else {
            panic!("parcel input should resolve");
        };

        assert!(state.apply(ticket, Err(EstimateError::LookupNotFound)));
        assert_eq!(
            state.output.message.as_deref(),
            Some("No property found. Try manual entry instead.")
        );
        assert!(state.output.tax_share.is_none());
        assert_eq!(state.form.parcel_id, "");
    }

    #[test]
    fn stale_ticket_does_not_overwrite_newer_result() {
        let mut state = AppState::new();
        state.form.set_parcel_id("111");
        let Submission::Pending(first, _) = state.submit() else {
            panic!("parcel input should resolve");
        };
        state.form.set_parcel_id("222");
        let Submission::Pending(second, _) = state.submit() else {
            panic!("parcel input should resolve");
        };
        assert!(second > first);

        assert!(state.apply(second, Ok(manual_estimate())));
        let snapshot = state.output.clone();

        assert!(!state.apply(first, Err(EstimateError::LookupNotFound)));
        assert_eq!(state.output, snapshot);
    }

    #[test]
    fn rejected_submission_invalidates_pending_lookup() {
        let mut state = AppState::new();
        state.form.set_parcel_id("111");
        let Submission::Pending(pending, _) = state.submit() else {
            panic!("parcel input should resolve");
        };
        state.form.clear();

        assert_eq!(state.submit(), Submission::Rejected);
        assert!(!state.apply(pending, Ok(manual_estimate())));
        assert_eq!(
            state.output.message.as_deref(),
            Some(InputError::NothingEntered.to_string().as_str())
        );
    }

    // =========================================================================
    // suggestions
    // =========================================================================

    #[test]
    fn selecting_suggestion_fills_address_and_closes_list() {
        let mut state = AppState::new();
        let ticket = state.begin_suggestion();
        assert!(state.apply_suggestions(
            ticket,
            vec![suggestion("1", "4970 CITY HALL BLVD"), suggestion("2", "4970 CITRUS WAY")],
        ));
        assert!(state.suggestions.is_open());

        let chosen = state.select_suggestion(1).unwrap();

        assert_eq!(chosen.id, "2");
        assert_eq!(state.form.street_address, "4970 CITRUS WAY");
        assert!(!state.suggestions.is_open());
    }

    #[test]
    fn out_of_range_selection_keeps_list_open() {
        let mut list = SuggestionList::default();
        list.show(vec![suggestion("1", "4970 CITY HALL BLVD")]);

        assert_eq!(list.select(3), Err(SelectionError::OutOfRange(4)));
        assert!(list.is_open());
    }

    #[test]
    fn dismiss_closes_list() {
        let mut list = SuggestionList::default();
        list.show(vec![suggestion("1", "4970 CITY HALL BLVD")]);

        list.dismiss();

        assert!(!list.is_open());
        assert_eq!(list.select(0), Err(SelectionError::Closed));
    }

    #[test]
    fn empty_candidate_list_stays_closed() {
        let mut list = SuggestionList::default();
        list.show(Vec::new());

        assert!(!list.is_open());
    }

    #[test]
    fn stale_suggestions_are_dropped() {
        let mut state = AppState::new();
        let old = state.begin_suggestion();
        let new = state.begin_suggestion();

        assert!(state.apply_suggestions(new, vec![suggestion("1", "4970 CITY HALL BLVD")]));
        assert!(!state.apply_suggestions(old, vec![suggestion("9", "1 OLD RD")]));
        assert_eq!(state.suggestions.candidates()[0].id, "1");
    }

    #[test]
    fn selection_makes_pending_suggestion_query_stale() {
        let mut state = AppState::new();
        let shown = state.begin_suggestion();
        state.apply_suggestions(shown, vec![suggestion("1", "4970 CITY HALL BLVD")]);
        let in_flight = state.begin_suggestion();
        state.apply_suggestions(in_flight, vec![suggestion("1", "4970 CITY HALL BLVD")]);

        state.select_suggestion(0).unwrap();

        assert!(!state.is_current_suggestion(in_flight));
    }

    #[test]
    fn with_form_keeps_fields_and_starts_without_tickets() {
        let mut form = FormFields::default();
        form.set_parcel_id("123456");

        let mut state = AppState::with_form(form.clone());

        assert_eq!(state.form, form);
        let Submission::Pending(ticket, _) = state.submit() else {
            panic!("parcel input should resolve");
        };
        assert_eq!(ticket.number(), 1);
    }
}
