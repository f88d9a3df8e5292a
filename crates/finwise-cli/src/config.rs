//! CLI settings.
//!
//! Read from the YAML file named by `--config`, else `FINWISE_CONFIG`.
//! Every field has a default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

use finwise_core::analytics::summary::TimeRange;
use finwise_core::analytics::TypeFilter;
use finwise_core::metrics::dashboard::DEFAULT_RECENT_LIMIT;

use crate::input::file::resolve_path;
use crate::output::OutputFormat;

pub const CONFIG_ENV: &str = "FINWISE_CONFIG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefixed to money fields in table output
    pub currency_symbol: String,
    pub default_output: OutputFormat,
    pub log_format: LogFormat,
    pub analytics_range: TimeRange,
    pub analytics_view: TypeFilter,
    pub recent_transactions: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            default_output: OutputFormat::Json,
            log_format: LogFormat::Text,
            analytics_range: TimeRange::SixMonths,
            analytics_view: TypeFilter::Expenses,
            recent_transactions: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Settings {
    /// Load from an explicit path, else from `FINWISE_CONFIG`, else
    /// defaults. An explicit path that does not exist is an error; a
    /// missing file named by the environment falls back to defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_env_path(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_env_path(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if resolve_path(path).is_err() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let canonical = resolve_path(path)?;
        let contents = std::fs::read_to_string(&canonical)
            .map_err(|e| format!("Failed to read settings '{}': {}", canonical.display(), e))?;
        Self::from_yaml(&contents)
            .map_err(|e| format!("Failed to parse settings '{}': {}", canonical.display(), e).into())
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }
}
