//! # RTC Token Test Utilities
//!
//! Shared test utilities for the `rtc-token` crate and its tools.
//!
//! This crate provides:
//! - Fixed test ids and a fixed clock (`TEST_NOW`)
//! - Deterministic app keys derived from a seed
//! - Test data builders (`TestTokenBuilder`)
//! - Helpers that craft raw wire strings for negative tests
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rtc_token::Privilege;
//! use rtc_token_test_utils::*;
//!
//! #[test]
//! fn test_example() {
//!     let raw = TestTokenBuilder::new()
//!         .for_room("123456")
//!         .with_privilege(Privilege::SubscribeStream, TEST_NOW)
//!         .expires_in(3600)
//!         .build_string();
//!
//!     raw.assert_verifies_at(&test_app_key(1), TEST_NOW)
//!         .assert_grants(Privilege::SubscribeStream, TEST_NOW);
//! }
//! ```

pub mod assertions;
pub mod key_fixtures;
pub mod test_ids;
pub mod token_builders;
pub mod wire;

// Re-export commonly used items
pub use assertions::*;
pub use key_fixtures::*;
pub use test_ids::*;
pub use token_builders::*;
pub use wire::*;
