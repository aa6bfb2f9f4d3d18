use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use levy_cli::app::{self, CommandOutput};
use levy_cli::config::Settings;
use levy_cli::state::FormFields;
use levy_cli::{logging, session};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Estimates a property's share of a special millage levy.
///
/// Look a property up by parcel ID or address, or enter the assessed value
/// and exemptions by hand.
#[derive(Debug, Parser)]
#[command(name = "levy-estimator", version, about)]
struct Cli {
    /// TOML config file. Defaults to `levy.toml` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Feature-service query endpoint, overriding the config file.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Millage rate, overriding the config file.
    #[arg(long, global = true)]
    millage: Option<Decimal>,

    /// Log filter (e.g. `debug`). `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the tax share once and exit.
    Estimate {
        #[arg(long)]
        parcel: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Assessed value; `$` and `,` are ignored.
        #[arg(long)]
        assessed: Option<String>,
        /// Exemption amount; `$` and `,` are ignored.
        #[arg(long)]
        exemption: Option<String>,
    },
    /// List addresses matching a fragment.
    Suggest { text: String },
    /// Fill in the form interactively.
    Session,
}

// ─── settings ────────────────────────────────────────────────────────────────

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(endpoint) = &cli.endpoint {
        settings.gis.endpoint = endpoint.clone();
    }
    if let Some(rate) = cli.millage {
        settings.levy.millage_rate = rate;
    }
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn finish(output: CommandOutput) -> ExitCode {
    print!("{}", output.text);
    if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    logging::init_logging(&settings.logging.level, settings.logging.file.as_deref())?;
    debug!(?settings, "settings loaded");

    let estimator = app::build_estimator(&settings).await?;
    let project_name = settings.levy.project_name.as_str();

    match cli.command {
        Command::Estimate {
            parcel,
            address,
            assessed,
            exemption,
        } => {
            let mut form = FormFields::default();
            form.set_street_address(address.as_deref().unwrap_or_default());
            form.set_parcel_id(parcel.as_deref().unwrap_or_default());
            form.set_assessed_value(assessed.as_deref().unwrap_or_default());
            form.set_exemption_value(exemption.as_deref().unwrap_or_default());
            Ok(finish(app::run_estimate(&estimator, project_name, form).await))
        }
        Command::Suggest { text } => Ok(finish(app::run_suggest(&estimator, &text).await)),
        Command::Session => {
            session::run_interactive(estimator, project_name).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
