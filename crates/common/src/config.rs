//! Logging configuration shared by the RTC token binaries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid log format: {0} (expected 'pretty' or 'json')")]
    InvalidLogFormat(String),
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive string (e.g. `rtc_token=debug,info`)
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLogFormat` if `LOG_FORMAT` is not recognised.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLogFormat` if `LOG_FORMAT` is not recognised.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let filter = vars
            .get("RUST_LOG")
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let format = match vars.get("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self { filter, format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars_defaults() {
        let config = LogConfig::from_vars(&HashMap::new()).expect("defaults should load");
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_from_vars_custom_filter_and_json() {
        let vars = HashMap::from([
            ("RUST_LOG".to_string(), "rtc_token=debug".to_string()),
            ("LOG_FORMAT".to_string(), "JSON".to_string()),
        ]);

        let config = LogConfig::from_vars(&vars).expect("config should load");
        assert_eq!(config.filter, "rtc_token=debug");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_from_vars_blank_filter_uses_default() {
        let vars = HashMap::from([("RUST_LOG".to_string(), "   ".to_string())]);

        let config = LogConfig::from_vars(&vars).expect("config should load");
        assert_eq!(config.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_from_vars_invalid_format() {
        let vars = HashMap::from([("LOG_FORMAT".to_string(), "xml".to_string())]);

        let result = LogConfig::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidLogFormat(v)) if v == "xml"));
    }

    #[test]
    fn test_log_format_display_round_trips() {
        for format in [LogFormat::Pretty, LogFormat::Json] {
            let parsed: LogFormat = format.to_string().parse().expect("parse");
            assert_eq!(parsed, format);
        }
    }
}
