//! Deterministic key fixtures.
//!
//! The same seed always yields the same key, and different seeds yield
//! different keys, so tests can model "right key" and "wrong key" without
//! hard-coding secrets in every file.

use crate::test_ids::TEST_APP_ID;
use common::secret::SecretString;
use rtc_token::{AppId, AppKey};

/// Deterministic app key for `seed`.
pub fn test_app_key(seed: u8) -> AppKey {
    let material: String = (0..32u8)
        .map(|i| {
            let nibble = seed.wrapping_mul(31).wrapping_add(i.wrapping_mul(7)) % 16;
            char::from_digit(u32::from(nibble), 16).unwrap()
        })
        .collect();
    AppKey::new(SecretString::from(format!("test-key-{seed}-{material}"))).unwrap()
}

/// The fixture application id.
pub fn test_app_id() -> AppId {
    AppId::new(TEST_APP_ID).unwrap()
}
