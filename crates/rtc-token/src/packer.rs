//! Canonical packing and HMAC-SHA256 signing.
//!
//! The packed message is compact JSON with a fixed key order:
//!
//! ```text
//! {"nonce":N,"issuedAt":T,"expireAt":T,"roomID":"..","userID":"..","privileges":{"0":T,..}}
//! ```
//!
//! The order comes from the field order of [`PackedMessageRef`], never from
//! map iteration, and privileges are emitted in ascending code order. Two
//! tokens with equal fields therefore always pack to identical bytes, which
//! is what the signature is computed over.

use crate::errors::TokenError;
use crate::privilege::PrivilegeSet;
use crate::token::{AccessToken, AppKey};
use base64::{engine::general_purpose::STANDARD, Engine};
use ring::hmac;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Borrowed view of the signed fields, in canonical order.
#[derive(Serialize)]
struct PackedMessageRef<'a> {
    nonce: u32,
    #[serde(rename = "issuedAt")]
    issued_at: i64,
    #[serde(rename = "expireAt")]
    expire_at: i64,
    #[serde(rename = "roomID")]
    room_id: &'a str,
    #[serde(rename = "userID")]
    user_id: &'a str,
    privileges: &'a PrivilegeSet,
}

/// Signed fields decoded from a packed message.
#[derive(Debug, Deserialize)]
pub(crate) struct PackedMessage {
    pub nonce: u32,
    #[serde(rename = "issuedAt")]
    pub issued_at: i64,
    #[serde(rename = "expireAt")]
    pub expire_at: i64,
    #[serde(rename = "roomID")]
    pub room_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub privileges: PrivilegeSet,
}

/// Pack the signed fields of `token` into canonical text.
///
/// # Errors
///
/// Returns `TokenError::Serialization` if JSON encoding fails.
pub fn pack(token: &AccessToken) -> Result<String, TokenError> {
    let message = PackedMessageRef {
        nonce: token.nonce(),
        issued_at: token.issued_at(),
        expire_at: token.expire_at(),
        room_id: token.room_id(),
        user_id: token.user_id(),
        privileges: token.privileges(),
    };
    Ok(serde_json::to_string(&message)?)
}

pub(crate) fn unpack(packed: &str) -> Result<PackedMessage, serde_json::Error> {
    serde_json::from_str(packed)
}

/// HMAC-SHA256 of `packed` under `app_key`, base64 encoded (standard
/// alphabet, padded).
#[instrument(skip_all)]
#[must_use]
pub fn sign(packed: &str, app_key: &AppKey) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, app_key.as_bytes());
    let tag = hmac::sign(&key, packed.as_bytes());
    STANDARD.encode(tag.as_ref())
}

/// Check a base64 signature over `packed` in constant time.
///
/// A signature that is not valid base64 is simply a mismatch.
#[instrument(skip_all)]
#[must_use]
pub fn verify_signature(packed: &str, app_key: &AppKey, signature: &str) -> bool {
    let Ok(provided) = STANDARD.decode(signature) else {
        tracing::debug!(target: "rtc_token", "Signature is not valid base64");
        return false;
    };

    let key = hmac::Key::new(hmac::HMAC_SHA256, app_key.as_bytes());
    hmac::verify(&key, packed.as_bytes(), &provided).is_ok()
}
