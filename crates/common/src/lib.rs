//! Common utilities shared across the RTC token crates.

#![warn(clippy::pedantic)]

/// Module for logging configuration loaded from the environment
pub mod config;

/// Module for tracing subscriber initialization
pub mod logging;

/// Module for secret types that prevent accidental logging
pub mod secret;
