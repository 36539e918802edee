//! Tracing subscriber bootstrap.
//!
//! Binaries call [`init`] once at startup. Library crates only emit events
//! through the `tracing` macros and never install a subscriber themselves.

use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber described by `config`.
///
/// An unparseable filter falls back to [`crate::config::DEFAULT_LOG_FILTER`].
/// Logs go to stderr so that binaries can keep stdout for their output.
///
/// # Errors
///
/// Returns `TryInitError` if a global subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(&config.filter)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }?;

    tracing::debug!(filter = %config.filter, format = %config.format, "Logging initialised");
    Ok(())
}
