//! Observability for the token codec.
//!
//! # Privacy by Default
//!
//! Crypto paths use `#[instrument(skip_all)]` and log only safe fields:
//! - **SAFE**: sizes, timestamps, privilege counts, failure categories
//! - **NEVER**: app keys, signatures, user ids, raw token strings
//!
//! The codec emits through the `metrics` facade. Nothing is recorded unless
//! the host process installs a recorder.

pub mod metrics;

pub use self::metrics::{record_parse, record_serialization, record_verification};
