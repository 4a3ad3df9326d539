//! Application configuration.
//!
//! Loaded from a JSON file; every field has a default so a partial file (or
//! none at all) is valid. A few environment variables override the file:
//!
//! * `RIDATSU_ANALYSIS_ENDPOINT`: `analysis.endpoint`
//! * `RIDATSU_API_KEY`: `analysis.apiKey`
//! * `RIDATSU_LOG`: `logging.filter`

use crate::error::ConfigError;
use crate::simulator::SimulatorConfig;
use serde::{Deserialize, Serialize};
use std::fs;

pub const ENV_ANALYSIS_ENDPOINT: &str = "RIDATSU_ANALYSIS_ENDPOINT";
pub const ENV_API_KEY: &str = "RIDATSU_API_KEY";
pub const ENV_LOG: &str = "RIDATSU_LOG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulatorConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where drop analyses are requested from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// URL accepting the analysis request JSON. Analysis is unavailable without it.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Sent as a bearer token when present.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout (default: 30s)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// An `EnvFilter` directive (default: "info")
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn from_json(json: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content, path)
    }

    /// Loads `path` if given, otherwise the defaults, then applies the
    /// process environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies overrides from a variable lookup. Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(endpoint) = get(ENV_ANALYSIS_ENDPOINT) {
            self.analysis.endpoint = Some(endpoint);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.analysis.api_key = Some(key);
        }
        if let Some(filter) = get(ENV_LOG) {
            self.logging.filter = filter;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::TerminalRule;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::from_json(
            r#"{ "simulation": { "terminalRule": "structural" }, "analysis": { "endpoint": "http://localhost:9000/analyze" } }"#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.simulation.terminal_rule, TerminalRule::Structural);
        assert_eq!(config.simulation.initial_volume.get(), 1000);
        assert_eq!(config.analysis.timeout_secs, 30);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = AppConfig::default().with_overrides(|key| match key {
            ENV_API_KEY => Some("secret".to_string()),
            ENV_LOG => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.analysis.api_key.as_deref(), Some("secret"));
        assert_eq!(config.logging.filter, "info");
        assert!(config.analysis.endpoint.is_none());
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = AppConfig::from_json("{ not json", "ridatsu.json").unwrap_err();
        assert!(err.to_string().contains("ridatsu.json"));
    }
}
