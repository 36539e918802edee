//! Error types for token construction, serialization and parsing.
//!
//! Parse failures carry deliberately generic messages. The concrete cause is
//! logged at debug level under the `rtc_token` target. Verification never
//! produces an error: it answers `true` or `false`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The version prefix does not match the supported token format.
    #[error("Invalid token version")]
    InvalidVersion,

    /// Malformed base64, JSON, or field content anywhere in the token.
    #[error("Invalid token format")]
    InvalidFormat,

    /// The application id is not exactly `APP_ID_LENGTH` ASCII characters.
    #[error("Invalid app id: expected {expected} ASCII characters, got {length}")]
    InvalidAppId { expected: usize, length: usize },

    /// An application key must not be empty.
    #[error("App key must not be empty")]
    EmptyAppKey,

    /// The token carries no application key, so it cannot be signed.
    #[error("Token has no app key to sign with")]
    MissingAppKey,

    /// The privilege code is not part of the enumeration.
    #[error("Unknown privilege code: {0}")]
    UnknownPrivilege(u8),

    /// Packing the token into its structured text form failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TokenError {
    fn from(err: serde_json::Error) -> Self {
        TokenError::Serialization(err.to_string())
    }
}
