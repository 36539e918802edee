//! Fixed test ids and timestamps for reproducible tests.

/// Application id used by every fixture (exactly 24 characters).
pub const TEST_APP_ID: &str = "68afed4e18ee8d017b08325f";

/// A second, distinct application id.
pub const TEST_APP_ID_ALT: &str = "5f1e2d3c4b5a69788796a5b4";

/// Fixed "current time" in unix seconds (2023-11-14T22:13:20Z).
pub const TEST_NOW: i64 = 1_700_000_000;

/// Fixed nonce so serialized fixtures are byte-stable.
pub const TEST_NONCE: u32 = 424_242;

pub const TEST_ROOM_ID: &str = "123456";
pub const TEST_USER_ID: &str = "123456";

pub const TEST_ROOM_ID_ALT: &str = "room-lobby";
pub const TEST_USER_ID_ALT: &str = "user-7";
