//! Wiring shared by the one-shot commands and the interactive session.

use anyhow::{Context, Result};
use levy_arcgis::ArcGisLookupFactory;
use levy_core::TaxEstimator;
use levy_core::calculations::LevyCalculator;
use levy_core::lookup::LookupRegistry;
use tracing::debug;

use crate::config::Settings;
use crate::render::{render_output, render_suggestions};
use crate::state::{AppState, FormFields, Submission};

/// Build a [`LookupRegistry`] with every compiled-in backend.
pub fn build_registry() -> LookupRegistry {
    LookupRegistry::new().with(ArcGisLookupFactory)
}

/// Creates the configured lookup backend and the estimator around it.
pub async fn build_estimator(settings: &Settings) -> Result<TaxEstimator> {
    let config = settings.lookup_config();
    debug!(backend = %config.backend, endpoint = %config.endpoint, "creating lookup backend");

    let lookup = build_registry()
        .connect(&config)
        .await
        .with_context(|| format!("cannot create '{}' lookup backend", config.backend))?;

    Ok(TaxEstimator::new(
        lookup,
        LevyCalculator::new(settings.levy.millage_rate),
    ))
}

/// What a one-shot command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

/// Submits `form` once and renders the resulting output regions.
pub async fn run_estimate(
    estimator: &TaxEstimator,
    project_name: &str,
    form: FormFields,
) -> CommandOutput {
    let mut state = AppState::with_form(form);

    if let Submission::Pending(ticket, mode) = state.submit() {
        let outcome = estimator.run(mode).await;
        state.apply(ticket, outcome);
    }

    CommandOutput {
        text: render_output(project_name, &state.output),
        success: state.output.tax_share.is_some(),
    }
}

/// Lists address candidates for `text`.
pub async fn run_suggest(
    estimator: &TaxEstimator,
    text: &str,
) -> CommandOutput {
    let mut state = AppState::new();
    let ticket = state.begin_suggestion();

    match estimator.suggest(text).await {
        Ok(candidates) if candidates.is_empty() => CommandOutput {
            text: "No matching addresses.\n".to_string(),
            success: true,
        },
        Ok(candidates) => {
            state.apply_suggestions(ticket, candidates);
            CommandOutput {
                text: render_suggestions(&state),
                success: true,
            }
        }
        Err(err) => CommandOutput {
            text: format!("{err}\n"),
            success: false,
        },
    }
}
