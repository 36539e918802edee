//! Metrics definitions for the token codec
//!
//! All metrics follow Prometheus naming conventions:
//! - `rtc_token_` prefix
//! - `_total` suffix for counters
//!
//! # Cardinality
//!
//! Labels are bounded by code:
//! - `status`: success/error for encode and parse, valid/invalid for verify
//! - `reason`: none, version, format, expired, signature

use metrics::counter;

/// Record a serialization attempt
///
/// Metric: `rtc_token_serializations_total`
/// Labels: `status`
pub fn record_serialization(status: &'static str) {
    counter!("rtc_token_serializations_total", "status" => status).increment(1);
}

/// Record a parse attempt
///
/// Metric: `rtc_token_parses_total`
/// Labels: `status`, `reason`
pub fn record_parse(status: &'static str, reason: &'static str) {
    counter!("rtc_token_parses_total", "status" => status, "reason" => reason).increment(1);
}

/// Record a verification outcome
///
/// Metric: `rtc_token_verifications_total`
/// Labels: `status`, `reason`
///
/// The reason never reaches the caller of `verify`; it is only visible to
/// operators through this counter.
pub fn record_verification(status: &'static str, reason: &'static str) {
    counter!("rtc_token_verifications_total", "status" => status, "reason" => reason)
        .increment(1);
}
