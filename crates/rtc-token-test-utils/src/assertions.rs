//! Custom assertions for raw token strings.
//!
//! Each assertion parses the token again and panics with a descriptive
//! message on failure. They return `&Self` so checks can be chained.

use rtc_token::{AccessToken, AppKey, Privilege, TokenError};

/// Assertions on a serialized token.
pub trait TokenAssertions {
    /// Assert the token parses.
    fn assert_parses(&self) -> &Self;

    /// Assert parsing fails with exactly `expected`.
    fn assert_parse_error(&self, expected: TokenError) -> &Self;

    /// Assert the token verifies under `key` at `now`.
    fn assert_verifies_at(&self, key: &AppKey, now: i64) -> &Self;

    /// Assert the token is rejected under `key` at `now`, either by the
    /// parser or by verification.
    fn assert_rejected_at(&self, key: &AppKey, now: i64) -> &Self;

    /// Assert the token grants `privilege` at `now` (signature not checked).
    fn assert_grants(&self, privilege: Privilege, now: i64) -> &Self;

    /// Assert the token does not grant `privilege` at `now`.
    fn assert_denies(&self, privilege: Privilege, now: i64) -> &Self;

    /// Assert the recorded expiry of `privilege`.
    fn assert_privilege_expiry(&self, privilege: Privilege, expected: i64) -> &Self;
}

fn parse_or_panic(raw: &str) -> AccessToken {
    AccessToken::parse(raw).unwrap_or_else(|e| panic!("token failed to parse: {e}"))
}

impl TokenAssertions for str {
    fn assert_parses(&self) -> &Self {
        parse_or_panic(self);
        self
    }

    fn assert_parse_error(&self, expected: TokenError) -> &Self {
        match AccessToken::parse(self) {
            Ok(_) => panic!("expected parse error {expected:?}, but token parsed"),
            Err(e) => assert_eq!(e, expected, "unexpected parse error"),
        }
        self
    }

    fn assert_verifies_at(&self, key: &AppKey, now: i64) -> &Self {
        let token = parse_or_panic(self);
        assert!(
            token.verify_at(key, now),
            "expected token to verify at {now} (expire_at = {})",
            token.expire_at()
        );
        self
    }

    fn assert_rejected_at(&self, key: &AppKey, now: i64) -> &Self {
        if let Ok(token) = AccessToken::parse(self) {
            assert!(
                !token.verify_at(key, now),
                "expected token to be rejected at {now}, but it verified"
            );
        }
        self
    }

    fn assert_grants(&self, privilege: Privilege, now: i64) -> &Self {
        let token = parse_or_panic(self);
        assert!(
            token.allows(privilege, now),
            "expected {privilege} to be granted at {now}, privileges: {:?}",
            token.privileges()
        );
        self
    }

    fn assert_denies(&self, privilege: Privilege, now: i64) -> &Self {
        let token = parse_or_panic(self);
        assert!(
            !token.allows(privilege, now),
            "expected {privilege} to be denied at {now}, privileges: {:?}",
            token.privileges()
        );
        self
    }

    fn assert_privilege_expiry(&self, privilege: Privilege, expected: i64) -> &Self {
        let token = parse_or_panic(self);
        assert_eq!(
            token.privileges().expiry(privilege),
            Some(expected),
            "unexpected expiry for {privilege}"
        );
        self
    }
}

impl TokenAssertions for String {
    fn assert_parses(&self) -> &Self {
        self.as_str().assert_parses();
        self
    }

    fn assert_parse_error(&self, expected: TokenError) -> &Self {
        self.as_str().assert_parse_error(expected);
        self
    }

    fn assert_verifies_at(&self, key: &AppKey, now: i64) -> &Self {
        self.as_str().assert_verifies_at(key, now);
        self
    }

    fn assert_rejected_at(&self, key: &AppKey, now: i64) -> &Self {
        self.as_str().assert_rejected_at(key, now);
        self
    }

    fn assert_grants(&self, privilege: Privilege, now: i64) -> &Self {
        self.as_str().assert_grants(privilege, now);
        self
    }

    fn assert_denies(&self, privilege: Privilege, now: i64) -> &Self {
        self.as_str().assert_denies(privilege, now);
        self
    }

    fn assert_privilege_expiry(&self, privilege: Privilege, expected: i64) -> &Self {
        self.as_str().assert_privilege_expiry(privilege, expected);
        self
    }
}
