//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Application keys
//! used to sign access tokens must always travel in one of these wrappers so
//! that `{:?}` formatting and tracing fields never print them.
//!
//! # Compile-Time Safety
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so any
//! struct that derives `Debug` while holding a secret gets safe logging for
//! free. Reading the value requires an explicit `expose_secret()` call, which
//! keeps every use of raw key material greppable.
//!
//! # Memory Safety
//!
//! Secrets are zeroized when dropped.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct IssuerSettings {
//!     app_id: String,
//!     app_key: SecretString,
//! }
//!
//! let settings = IssuerSettings {
//!     app_id: "68afed4e18ee8d017b08325f".to_string(),
//!     app_key: SecretString::from("issuer-secret"),
//! };
//!
//! // Safe: app_key is redacted
//! println!("{:?}", settings);
//!
//! let key: &str = settings.app_key.expose_secret();
//! assert_eq!(key, "issuer-secret");
//! ```
//!
//! # Usage Guidelines
//!
//! Use `SecretString` for application keys, and for any configuration value
//! read from `RTC_APP_KEY`. Use `SecretBox<T>` for binary key material.

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("app-key-123");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("app-key-123"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("app-key-456");
        assert_eq!(secret.expose_secret(), "app-key-456");
    }

    #[test]
    fn test_issuer_settings_are_safe_to_debug() {
        #[allow(dead_code)]
        #[derive(Debug)]
        struct IssuerSettings {
            app_id: String,
            app_key: SecretString,
        }

        let settings = IssuerSettings {
            app_id: "68afed4e18ee8d017b08325f".to_string(),
            app_key: SecretString::from("super-secret"),
        };

        let debug_str = format!("{settings:?}");

        assert!(debug_str.contains("68afed4e18ee8d017b08325f"));
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super-secret"));
    }

    #[test]
    fn test_deserialize_app_key() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct KeyEntry {
            app_id: String,
            app_key: SecretString,
        }

        let json = r#"{"app_id": "68afed4e18ee8d017b08325f", "app_key": "my-secret-value"}"#;
        let entry: KeyEntry = serde_json::from_str(json).expect("deserialize");

        assert_eq!(entry.app_key.expose_secret(), "my-secret-value");

        let debug = format!("{entry:?}");
        assert!(!debug.contains("my-secret-value"));
        assert!(debug.contains("REDACTED"));
    }
}
