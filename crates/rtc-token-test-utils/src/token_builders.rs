//! Test data builders for access tokens.

use crate::key_fixtures::{test_app_id, test_app_key};
use crate::test_ids::{TEST_NONCE, TEST_NOW, TEST_ROOM_ID, TEST_USER_ID};
use rtc_token::{AccessToken, AppId, AppKey, Privilege};

/// Fluent builder for signed test tokens.
///
/// Defaults: fixture app id, key seed 1, room and user `"123456"`, issued at
/// `TEST_NOW` with `TEST_NONCE`, no privileges and no envelope expiry.
///
/// # Example
/// ```rust,ignore
/// let raw = TestTokenBuilder::new()
///     .for_user("alice")
///     .with_privilege(Privilege::PublishStream, TEST_NOW + 60)
///     .build_string();
/// ```
#[derive(Debug, Clone)]
pub struct TestTokenBuilder {
    app_id: AppId,
    app_key: AppKey,
    room_id: String,
    user_id: String,
    issued_at: i64,
    nonce: u32,
    expire_at: i64,
    grants: Vec<(Privilege, i64)>,
}

impl TestTokenBuilder {
    pub fn new() -> Self {
        Self {
            app_id: test_app_id(),
            app_key: test_app_key(1),
            room_id: TEST_ROOM_ID.to_string(),
            user_id: TEST_USER_ID.to_string(),
            issued_at: TEST_NOW,
            nonce: TEST_NONCE,
            expire_at: 0,
            grants: Vec::new(),
        }
    }

    pub fn with_app_id(mut self, app_id: AppId) -> Self {
        self.app_id = app_id;
        self
    }

    /// Sign with the fixture key for `seed`.
    pub fn signed_with(mut self, seed: u8) -> Self {
        self.app_key = test_app_key(seed);
        self
    }

    pub fn with_key(mut self, app_key: AppKey) -> Self {
        self.app_key = app_key;
        self
    }

    pub fn for_room(mut self, room_id: &str) -> Self {
        self.room_id = room_id.to_string();
        self
    }

    pub fn for_user(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    pub fn issued_at(mut self, issued_at: i64) -> Self {
        self.issued_at = issued_at;
        self
    }

    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = nonce;
        self
    }

    /// Grants are applied in call order, so later grants win.
    pub fn with_privilege(mut self, privilege: Privilege, expire_at: i64) -> Self {
        self.grants.push((privilege, expire_at));
        self
    }

    /// Envelope expiry relative to the issue time.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expire_at = self.issued_at + seconds;
        self
    }

    pub fn expires_at(mut self, expire_at: i64) -> Self {
        self.expire_at = expire_at;
        self
    }

    /// Build the unsigned token.
    pub fn build(self) -> AccessToken {
        let mut token = AccessToken::new_at(
            self.app_id,
            self.app_key,
            self.room_id,
            self.user_id,
            self.issued_at,
            self.nonce,
        );
        for (privilege, expire_at) in self.grants {
            token.add_privilege(privilege, expire_at);
        }
        token.expire_time(self.expire_at);
        token
    }

    /// Build, sign and serialize.
    pub fn build_string(self) -> String {
        self.build()
            .serialize()
            .expect("fixture token should serialize")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
