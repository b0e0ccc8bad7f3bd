//! Application configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working mock-mode setup. CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use signaldesk_core::data::{DEFAULT_RATES_URL, DEFAULT_SEARCH_URL};
use signaldesk_core::{PlanParams, SymbolMatcher};

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which implementation backs the provider traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Seeded, offline demo data.
    #[default]
    Mock,
    /// HTTP prediction backend, symbol search and rate service.
    Live,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Master seed for mock signals and synthetic series.
    pub seed: u64,
    /// TOML symbol listing that replaces the built-in one.
    pub directory: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Mock,
            seed: 42,
            directory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub prediction_base_url: String,
    pub search_url: String,
    pub rates_url: String,
    pub timeout_secs: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            prediction_base_url: "http://127.0.0.1:8001".into(),
            search_url: DEFAULT_SEARCH_URL.into(),
            rates_url: DEFAULT_RATES_URL.into(),
            timeout_secs: 10,
        }
    }
}

impl EndpointsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Days of synthetic history before the anchor point.
    pub num_days: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self { num_days: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// ISO code prices are shown in.
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Where recent predictions are saved. `None` keeps them in memory only.
    pub path: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub endpoints: EndpointsConfig,
    pub plan: PlanParams,
    pub series: SeriesConfig,
    pub search: SymbolMatcher,
    pub display: DisplayConfig,
    pub history: HistoryConfig,
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Reject values no request could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.plan
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.series.num_days == 0 {
            return Err(ConfigError::Invalid("series.num_days must be at least 1".into()));
        }
        if self.search.min_query_len == 0 {
            return Err(ConfigError::Invalid(
                "search.min_query_len must be at least 1".into(),
            ));
        }
        if self.endpoints.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "endpoints.timeout_secs must be at least 1".into(),
            ));
        }
        let code = self.display.currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "display.currency must be a 3-letter code, got '{}'",
                self.display.currency
            )));
        }
        if self.source.kind == SourceKind::Live {
            for (name, url) in [
                ("prediction_base_url", &self.endpoints.prediction_base_url),
                ("search_url", &self.endpoints.search_url),
                ("rates_url", &self.endpoints.rates_url),
            ] {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid(format!(
                        "endpoints.{name} must be an http(s) URL, got '{url}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.source.kind, SourceKind::Mock);
        assert_eq!(config.series.num_days, 30);
        assert_eq!(config.plan.target_pct, 0.10);
        assert_eq!(config.search.exchange_marker, "NSE");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [source]
            kind = "live"

            [plan]
            target_pct = 0.05
            stop_pct = 0.02

            [display]
            currency = "INR"
            "#,
        )
        .unwrap();
        assert_eq!(config.source.kind, SourceKind::Live);
        assert_eq!(config.source.seed, 42);
        assert_eq!(config.plan.target_pct, 0.05);
        assert_eq!(config.plan.confidence_floor, 85.0);
        assert_eq!(config.display.currency, "INR");
        assert_eq!(config.endpoints.timeout_secs, 10);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for toml in [
            "[plan]\ntarget_pct = 1.5",
            "[series]\nnum_days = 0",
            "[search]\nmin_query_len = 0",
            "[display]\ncurrency = \"dollars\"",
            "[endpoints]\ntimeout_secs = 0",
            "[source]\nkind = \"live\"\n[endpoints]\nrates_url = \"ftp://x\"",
        ] {
            assert!(
                matches!(AppConfig::from_toml(toml), Err(ConfigError::Invalid(_))),
                "expected rejection for {toml}"
            );
        }
    }

    #[test]
    fn unknown_source_kind_is_parse_error() {
        let err = AppConfig::from_toml("[source]\nkind = \"carrier-pigeon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::from_file(Path::new("/nonexistent/signaldesk.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
