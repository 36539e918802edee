//! Stock issuance for joining a room.
//!
//! [`issue_room_token`] grants what a participant needs to join a call:
//! subscribe to everyone, publish audio/video/data for a shorter window,
//! all wrapped in an envelope that expires after the token TTL.

use crate::errors::TokenError;
use crate::privilege::Privilege;
use crate::token::{random_nonce, AccessToken, AppId, AppKey};
use std::time::Duration;
use tracing::instrument;

/// Default publish window (1 hour).
pub const DEFAULT_PUBLISH_TTL: Duration = Duration::from_secs(3600);

/// Default envelope lifetime (2 hours).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7200);

/// Lifetimes applied by [`issue_room_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuePolicy {
    /// How long the publish privileges last after issuance.
    pub publish_ttl: Duration,
    /// How long the token envelope lasts after issuance.
    pub token_ttl: Duration,
    /// How long subscribing lasts after issuance. `None` grants subscribe
    /// with no per-privilege expiry, bounded only by the envelope.
    pub subscribe_ttl: Option<Duration>,
}

impl Default for IssuePolicy {
    fn default() -> Self {
        Self {
            publish_ttl: DEFAULT_PUBLISH_TTL,
            token_ttl: DEFAULT_TOKEN_TTL,
            subscribe_ttl: None,
        }
    }
}

fn offset(now: i64, ttl: Duration) -> i64 {
    now.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
}

/// Build an unsigned room token at `now` with the grants of `policy`.
#[must_use]
pub fn build_room_token(
    app_id: AppId,
    app_key: AppKey,
    room_id: &str,
    user_id: &str,
    policy: &IssuePolicy,
    now: i64,
) -> AccessToken {
    let mut token = AccessToken::new_at(app_id, app_key, room_id, user_id, now, random_nonce());

    let subscribe_expire_at = policy.subscribe_ttl.map_or(0, |ttl| offset(now, ttl));
    token.add_privilege(Privilege::SubscribeStream, subscribe_expire_at);
    token.add_privilege(Privilege::PublishStream, offset(now, policy.publish_ttl));
    token.expire_time(offset(now, policy.token_ttl));

    token
}

/// Issue and serialize a room token at `now`.
///
/// # Errors
///
/// Returns `TokenError::Serialization` if encoding fails.
#[instrument(skip_all)]
pub fn issue_room_token(
    app_id: AppId,
    app_key: AppKey,
    room_id: &str,
    user_id: &str,
    policy: &IssuePolicy,
    now: i64,
) -> Result<String, TokenError> {
    let mut token = build_room_token(app_id, app_key, room_id, user_id, policy, now);
    let raw = token.serialize()?;

    tracing::info!(
        target: "rtc_token",
        expire_at = token.expire_at(),
        "Issued room token"
    );

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    const NOW: i64 = 1_700_000_000;

    fn app_id() -> AppId {
        AppId::new("68afed4e18ee8d017b08325f").unwrap()
    }

    fn key() -> AppKey {
        AppKey::try_from("issuer-key").unwrap()
    }

    #[test]
    fn test_default_policy_grants() {
        let token = build_room_token(app_id(), key(), "123456", "u1", &IssuePolicy::default(), NOW);

        assert_eq!(token.issued_at(), NOW);
        assert_eq!(token.expire_at(), NOW + 7200);
        assert_eq!(token.privileges().expiry(Privilege::SubscribeStream), Some(0));
        for p in [
            Privilege::PublishStream,
            Privilege::PublishAudioStream,
            Privilege::PublishVideoStream,
            Privilege::PublishDataStream,
        ] {
            assert_eq!(token.privileges().expiry(p), Some(NOW + 3600));
        }
    }

    #[test]
    fn test_subscribe_ttl_sets_expiry() {
        let policy = IssuePolicy {
            subscribe_ttl: Some(Duration::from_secs(60)),
            ..IssuePolicy::default()
        };
        let token = build_room_token(app_id(), key(), "r", "u", &policy, NOW);
        assert_eq!(
            token.privileges().expiry(Privilege::SubscribeStream),
            Some(NOW + 60)
        );
    }

    #[test]
    fn test_issued_token_verifies() {
        let raw = issue_room_token(app_id(), key(), "r", "u", &IssuePolicy::default(), NOW).unwrap();
        let parsed = codec::parse(&raw).unwrap();

        assert!(parsed.verify_at(&key(), NOW + 1));
        assert!(parsed.allows(Privilege::PublishAudioStream, NOW + 3600));
        assert!(!parsed.allows(Privilege::PublishAudioStream, NOW + 3601));
        assert!(parsed.allows(Privilege::SubscribeStream, NOW + 7200));
        assert!(!parsed.verify_at(&key(), NOW + 7201));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let policy = IssuePolicy {
            token_ttl: Duration::from_secs(u64::MAX),
            ..IssuePolicy::default()
        };
        let token = build_room_token(app_id(), key(), "r", "u", &policy, NOW);
        assert_eq!(token.expire_at(), i64::MAX);
    }
}
