//! TOML configuration.
//!
//! ```toml
//! [gis]
//! backend = "arcgis"
//! endpoint = "https://services3.arcgis.com/.../FeatureServer/0/query"
//! municipality_filter = "MUNICIPALITY = 'NORTH PORT'"
//! timeout_secs = 15
//! suggestion_limit = 10
//!
//! [levy]
//! project_name = "PD Headquarters"
//! millage_rate = "0.6180"
//!
//! [logging]
//! level = "info"
//! file = "levy-estimator.log"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::{Path, PathBuf};

use levy_core::calculations::DEFAULT_MILLAGE_RATE;
use levy_core::lookup::LookupConfig;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "levy.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("millage rate must not be negative (got {0})")]
    InvalidMillageRate(Decimal),

    #[error("suggestion_limit must be at least 1")]
    InvalidSuggestionLimit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gis: GisSettings,
    pub levy: LevySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GisSettings {
    pub backend: String,
    pub endpoint: String,
    pub municipality_filter: Option<String>,
    pub timeout_secs: u64,
    pub suggestion_limit: usize,
}

impl Default for GisSettings {
    fn default() -> Self {
        let lookup = LookupConfig::default();
        Self {
            backend: lookup.backend,
            endpoint: lookup.endpoint,
            municipality_filter: lookup.municipality_filter,
            timeout_secs: lookup.timeout_secs,
            suggestion_limit: lookup.suggestion_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LevySettings {
    /// Name used in the "share of property tax" line.
    pub project_name: String,
    /// Mills levied for the project: dollars per $1,000 of taxable value.
    pub millage_rate: Decimal,
}

impl Default for LevySettings {
    fn default() -> Self {
        Self {
            project_name: "PD Headquarters".to_string(),
            millage_rate: DEFAULT_MILLAGE_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Append log records here in addition to stdout.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Settings {
    /// Loads settings.
    ///
    /// Resolution order:
    /// 1. `explicit`, if given. The file must exist.
    /// 2. [`DEFAULT_CONFIG_FILE`] in the working directory, if present.
    /// 3. Built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.is_file() {
                    return Ok(Self::default());
                }
                local
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })
    }

    /// Parses and validates TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levy.millage_rate.is_sign_negative() && !self.levy.millage_rate.is_zero() {
            return Err(ConfigError::InvalidMillageRate(self.levy.millage_rate));
        }
        if self.gis.suggestion_limit == 0 {
            return Err(ConfigError::InvalidSuggestionLimit);
        }
        Ok(())
    }

    pub fn lookup_config(&self) -> LookupConfig {
        LookupConfig {
            backend: self.gis.backend.clone(),
            endpoint: self.gis.endpoint.clone(),
            municipality_filter: self.gis.municipality_filter.clone(),
            timeout_secs: self.gis.timeout_secs,
            suggestion_limit: self.gis.suggestion_limit,
        }
    }
}
