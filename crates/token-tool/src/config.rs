//! Environment configuration for `token-tool`.

use common::secret::SecretString;
use rtc_token::{AppId, AppKey, IssuePolicy, TokenError};
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid {var}: {source}")]
    InvalidCredential {
        var: &'static str,
        source: TokenError,
    },

    #[error("Invalid {var}: expected whole seconds, got '{value}'")]
    InvalidSeconds { var: &'static str, value: String },
}

/// Settings read from `RTC_*` environment variables.
///
/// Credentials are optional here because `inspect` needs neither; commands
/// that sign or verify ask for them through [`ToolConfig::app_id`] and
/// [`ToolConfig::app_key`].
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    app_id: Option<AppId>,
    app_key: Option<AppKey>,
    pub policy: IssuePolicy,
}

impl ToolConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let app_id = vars
            .get("RTC_APP_ID")
            .map(|value| AppId::new(value.trim()))
            .transpose()
            .map_err(|source| ConfigError::InvalidCredential {
                var: "RTC_APP_ID",
                source,
            })?;

        let app_key = vars
            .get("RTC_APP_KEY")
            .map(|value| AppKey::new(SecretString::from(value.clone())))
            .transpose()
            .map_err(|source| ConfigError::InvalidCredential {
                var: "RTC_APP_KEY",
                source,
            })?;

        let defaults = IssuePolicy::default();
        let policy = IssuePolicy {
            publish_ttl: seconds(vars, "RTC_PUBLISH_TTL_SECONDS")?.unwrap_or(defaults.publish_ttl),
            token_ttl: seconds(vars, "RTC_TOKEN_TTL_SECONDS")?.unwrap_or(defaults.token_ttl),
            subscribe_ttl: seconds(vars, "RTC_SUBSCRIBE_TTL_SECONDS")?.or(defaults.subscribe_ttl),
        };

        Ok(Self {
            app_id,
            app_key,
            policy,
        })
    }

    /// The configured application id.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `RTC_APP_ID` was not set.
    pub fn app_id(&self) -> Result<&AppId, ConfigError> {
        self.app_id
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar("RTC_APP_ID"))
    }

    /// The configured signing key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `RTC_APP_KEY` was not set.
    pub fn app_key(&self) -> Result<&AppKey, ConfigError> {
        self.app_key
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar("RTC_APP_KEY"))
    }
}

fn seconds(
    vars: &HashMap<String, String>,
    var: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    vars.get(var)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidSeconds {
                    var,
                    value: value.clone(),
                })
        })
        .transpose()
}
