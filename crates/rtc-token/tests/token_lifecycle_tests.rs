//! End-to-end token lifecycle: issue, transport, parse, verify, authorize.

use rtc_token::{
    issue_room_token, AccessToken, AppId, AppKey, IssuePolicy, Privilege, PrivilegeSet, TokenError,
    MAX_TOKEN_SIZE_BYTES, VERSION,
};
use rtc_token_test_utils::*;
use std::time::Duration;

#[test]
fn test_room_token_scenario() {
    // Subscribe valid until now, publish for an hour, token for two hours.
    let raw = TestTokenBuilder::new()
        .for_room("123456")
        .for_user("123456")
        .with_privilege(Privilege::SubscribeStream, TEST_NOW)
        .with_privilege(Privilege::PublishStream, TEST_NOW + 3600)
        .expires_at(TEST_NOW + 7200)
        .build_string();

    let key = test_app_key(1);
    raw.assert_verifies_at(&key, TEST_NOW)
        .assert_verifies_at(&key, TEST_NOW + 7200)
        .assert_rejected_at(&key, TEST_NOW + 7201)
        .assert_privilege_expiry(Privilege::PublishStream, TEST_NOW + 3600)
        .assert_privilege_expiry(Privilege::PublishAudioStream, TEST_NOW + 3600)
        .assert_privilege_expiry(Privilege::PublishVideoStream, TEST_NOW + 3600)
        .assert_privilege_expiry(Privilege::PublishDataStream, TEST_NOW + 3600)
        .assert_privilege_expiry(Privilege::SubscribeStream, TEST_NOW);

    let parsed = AccessToken::parse(&raw).unwrap();
    assert_eq!(parsed.privileges().len(), 5);
    assert_eq!(parsed.room_id(), "123456");
    assert_eq!(parsed.user_id(), "123456");
}

#[test]
fn test_wire_header() {
    let raw = TestTokenBuilder::new().build_string();
    let parts = split_raw_token(&raw).unwrap();

    assert_eq!(parts.version, VERSION);
    assert_eq!(parts.app_id, TEST_APP_ID);
    assert!(parts.msg.starts_with(r#"{"nonce":424242,"issuedAt":1700000000,"expireAt":0,"#));
}

#[test]
fn test_wrong_key_is_rejected() {
    TestTokenBuilder::new()
        .signed_with(1)
        .build_string()
        .assert_verifies_at(&test_app_key(1), TEST_NOW)
        .assert_rejected_at(&test_app_key(2), TEST_NOW)
        .assert_rejected_at(&AppKey::try_from("k").unwrap(), TEST_NOW);
}

#[test]
fn test_zero_expiry_never_expires() {
    TestTokenBuilder::new()
        .with_privilege(Privilege::SubscribeStream, 0)
        .build_string()
        .assert_verifies_at(&test_app_key(1), i64::MAX)
        .assert_grants(Privilege::SubscribeStream, i64::MAX);
}

#[test]
fn test_privilege_expiry_is_independent_of_signature() {
    // The envelope is still valid; only the publish grant has lapsed.
    TestTokenBuilder::new()
        .with_privilege(Privilege::PublishStream, TEST_NOW + 10)
        .with_privilege(Privilege::SubscribeStream, 0)
        .expires_in(100)
        .build_string()
        .assert_verifies_at(&test_app_key(1), TEST_NOW + 50)
        .assert_denies(Privilege::PublishVideoStream, TEST_NOW + 50)
        .assert_grants(Privilege::SubscribeStream, TEST_NOW + 50);
}

#[test]
fn test_later_grant_overwrites_cascade() {
    TestTokenBuilder::new()
        .with_privilege(Privilege::PublishStream, 100)
        .with_privilege(Privilege::PublishAudioStream, 50)
        .build_string()
        .assert_privilege_expiry(Privilege::PublishStream, 100)
        .assert_privilege_expiry(Privilege::PublishAudioStream, 50)
        .assert_privilege_expiry(Privilege::PublishDataStream, 100);
}

#[test]
fn test_verify_is_repeatable_and_does_not_mutate() {
    let raw = TestTokenBuilder::new().expires_in(10).build_string();
    let token = AccessToken::parse(&raw).unwrap();
    let key = test_app_key(1);
    let signature = token.signature().to_string();

    for _ in 0..3 {
        assert!(token.verify_at(&key, TEST_NOW));
        assert!(!token.verify_at(&key, TEST_NOW + 11));
    }
    assert_eq!(token.signature(), signature);
}

#[test]
fn test_verify_uses_wall_clock() {
    // Issued now with no envelope expiry, so the wall clock cannot reject it.
    let mut token = AccessToken::new(test_app_id(), test_app_key(3), "r", "u");
    token.add_privilege(Privilege::SubscribeStream, 0);
    let parsed = AccessToken::parse(&token.serialize().unwrap()).unwrap();

    assert!(parsed.verify(&test_app_key(3)));
}

#[test]
fn test_long_ago_expiry_fails_wall_clock_verify() {
    let raw = TestTokenBuilder::new().issued_at(1_000).expires_in(1).build_string();
    let parsed = AccessToken::parse(&raw).unwrap();

    assert!(!parsed.verify(&test_app_key(1)));
}

#[test]
fn test_distinct_nonces_change_the_signature() {
    let make = |nonce| {
        let mut token =
            AccessToken::new_at(test_app_id(), test_app_key(1), "r", "u", TEST_NOW, nonce);
        token.serialize().unwrap();
        token
    };
    let a = make(1);
    let b = make(2);

    assert_ne!(a.signature(), b.signature());
}

#[test]
fn test_issue_room_token_defaults() {
    let raw = issue_room_token(
        test_app_id(),
        test_app_key(1),
        TEST_ROOM_ID,
        TEST_USER_ID,
        &IssuePolicy::default(),
        TEST_NOW,
    )
    .unwrap();

    let key = test_app_key(1);
    raw.assert_verifies_at(&key, TEST_NOW + 7200)
        .assert_rejected_at(&key, TEST_NOW + 7201)
        .assert_privilege_expiry(Privilege::PublishStream, TEST_NOW + 3600)
        .assert_privilege_expiry(Privilege::SubscribeStream, 0)
        .assert_grants(Privilege::SubscribeStream, TEST_NOW + 7000)
        .assert_denies(Privilege::PublishVideoStream, TEST_NOW + 3601);
}

#[test]
fn test_issue_room_token_custom_policy() {
    let policy = IssuePolicy {
        publish_ttl: Duration::from_secs(60),
        token_ttl: Duration::from_secs(120),
        subscribe_ttl: Some(Duration::from_secs(90)),
    };
    let raw = issue_room_token(
        test_app_id(),
        test_app_key(1),
        TEST_ROOM_ID_ALT,
        TEST_USER_ID_ALT,
        &policy,
        TEST_NOW,
    )
    .unwrap();

    raw.assert_privilege_expiry(Privilege::PublishDataStream, TEST_NOW + 60)
        .assert_privilege_expiry(Privilege::SubscribeStream, TEST_NOW + 90)
        .assert_rejected_at(&test_app_key(1), TEST_NOW + 121);
}

#[test]
fn test_parse_errors() {
    "".assert_parse_error(TokenError::InvalidVersion);
    "002".assert_parse_error(TokenError::InvalidVersion);
    "001".assert_parse_error(TokenError::InvalidFormat);
    format!("001{TEST_APP_ID}").assert_parse_error(TokenError::InvalidFormat);
    format!("001{TEST_APP_ID}%%%%").assert_parse_error(TokenError::InvalidFormat);
    "001"
        .repeat(MAX_TOKEN_SIZE_BYTES)
        .assert_parse_error(TokenError::InvalidFormat);
}

#[test]
fn test_forged_fields_do_not_verify() {
    let issue = || {
        TestTokenBuilder::new()
            .with_privilege(Privilege::SubscribeStream, TEST_NOW)
            .expires_in(60)
    };
    let original = split_raw_token(&issue().build_string()).unwrap();
    let key = test_app_key(1);

    // Each forgery is a well-formed message the issuer never signed.
    let forgeries = [
        issue().expires_at(0),
        issue().for_room("other-room"),
        issue().for_user("mallory"),
        issue().with_nonce(1),
        issue().with_privilege(Privilege::PublishStream, 0),
    ];

    for builder in forgeries {
        let forged_msg = split_raw_token(&builder.signed_with(9).build_string())
            .unwrap()
            .msg;
        assert_ne!(forged_msg, original.msg);

        let forged = encode_raw_token(
            &original.version,
            &original.app_id,
            &forged_msg,
            &original.signature,
        );
        forged.assert_parses().assert_rejected_at(&key, TEST_NOW);
    }
}

#[test]
fn test_reordered_message_is_rejected() {
    let raw = TestTokenBuilder::new()
        .with_privilege(Privilege::SubscribeStream, TEST_NOW)
        .expires_in(60)
        .build_string();

    // Re-emitting the message with sorted keys keeps every value intact.
    let reordered = forge_message(&raw, |_| {}).unwrap();
    reordered.assert_parse_error(TokenError::InvalidFormat);
}

#[test]
fn test_reissued_token_keeps_its_own_grants() {
    // A wire-level set that no single grant sequence could produce.
    let msg = concat!(
        r#"{"nonce":1,"issuedAt":1700000000,"expireAt":0,"roomID":"r","userID":"u","#,
        r#""privileges":{"0":5,"1":9}}"#
    );
    let parsed = AccessToken::parse(&encode_raw_token(VERSION, TEST_APP_ID, msg, "")).unwrap();
    assert_eq!(parsed.privileges().len(), 2);

    let mut token = AccessToken::new_at(
        parsed.app_id().clone(),
        test_app_key(1),
        parsed.room_id(),
        parsed.user_id(),
        parsed.issued_at(),
        parsed.nonce(),
    );
    for (privilege, expire_at) in parsed.privileges().iter() {
        token.add_privilege(privilege, expire_at);
    }
    let reparsed = AccessToken::parse(&token.serialize().unwrap()).unwrap();

    // Re-granting cascades again, so the copy fills in video and data.
    assert_eq!(reparsed.privileges(), token.privileges());
    assert_eq!(reparsed.privileges().expiry(Privilege::PublishAudioStream), Some(9));
    assert_eq!(reparsed.privileges().expiry(Privilege::PublishVideoStream), Some(5));
    assert_ne!(reparsed.privileges(), parsed.privileges());
}

#[test]
fn test_public_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<AccessToken>();
    assert_send_sync::<AppKey>();
    assert_send_sync::<AppId>();
    assert_send_sync::<PrivilegeSet>();
    assert_send_sync::<TokenError>();
}

#[test]
fn test_concurrent_verification_agrees() {
    let raw = TestTokenBuilder::new()
        .with_privilege(Privilege::PublishStream, TEST_NOW + 10)
        .expires_in(60)
        .build_string();
    let token = AccessToken::parse(&raw).unwrap();
    let key = test_app_key(1);
    let other = test_app_key(2);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let (token, key, other) = (&token, &key, &other);
                scope.spawn(move || {
                    (0..50).all(|_| {
                        token.verify_at(key, TEST_NOW + i)
                            && !token.verify_at(other, TEST_NOW + i)
                            && !token.verify_at(key, TEST_NOW + 61)
                    })
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}

#[test]
fn test_swapped_signature_does_not_verify() {
    let a = TestTokenBuilder::new().for_user("a").build_string();
    let b = TestTokenBuilder::new().for_user("b").build_string();

    let a_parts = split_raw_token(&a).unwrap();
    let b_parts = split_raw_token(&b).unwrap();
    let spliced = encode_raw_token(
        &a_parts.version,
        &a_parts.app_id,
        &a_parts.msg,
        &b_parts.signature,
    );

    spliced.assert_parses().assert_rejected_at(&test_app_key(1), TEST_NOW);
}
