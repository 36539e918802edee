#![no_main]

use libfuzzer_sys::fuzz_target;
use rtc_token::{AccessToken, AppKey};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing and verifying untrusted input must never panic
    if let Ok(token) = AccessToken::parse(raw) {
        if let Ok(key) = AppKey::try_from("fuzz-key") {
            let _ = token.verify_at(&key, 0);
            let _ = token.verify_at(&key, i64::MAX);
        }
    }
});
