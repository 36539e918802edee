#![no_main]

use libfuzzer_sys::fuzz_target;
use rtc_token::{AccessToken, AppKey};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(parsed) = AccessToken::parse(raw) else {
        return;
    };
    let Ok(key) = AppKey::try_from("fuzz-key") else {
        return;
    };

    // Re-issue whatever parsed under our own key. Re-granting cascades again,
    // so the copy's privileges can differ from the parsed set.
    let mut token = AccessToken::new_at(
        parsed.app_id().clone(),
        key.clone(),
        parsed.room_id(),
        parsed.user_id(),
        parsed.issued_at(),
        parsed.nonce(),
    );
    for (privilege, expire_at) in parsed.privileges().iter() {
        token.add_privilege(privilege, expire_at);
    }
    token.expire_time(parsed.expire_at());

    let resigned = token.serialize().expect("re-serialize parsed token");
    let reparsed = AccessToken::parse(&resigned).expect("parse re-signed token");

    assert_eq!(reparsed.room_id(), parsed.room_id());
    assert_eq!(reparsed.user_id(), parsed.user_id());
    assert_eq!(reparsed.issued_at(), parsed.issued_at());
    assert_eq!(reparsed.nonce(), parsed.nonce());
    assert_eq!(reparsed.expire_at(), parsed.expire_at());
    assert_eq!(reparsed.privileges(), token.privileges());
    assert!(reparsed.verify_at(&key, parsed.expire_at()));
});
