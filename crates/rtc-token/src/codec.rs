//! Wire codec: token string encoding, parsing and verification.
//!
//! ```text
//! <version:3 bytes><appId:24 bytes><base64({"msg": packed, "signature": sig})>
//! ```
//!
//! The version tag and app id are positional, so a verifier can read the app
//! id (to look up its key) before touching any encoded content.
//!
//! # Security
//!
//! - Input size is checked before any decoding
//! - Parse errors are generic; causes are logged at debug level only
//! - Only the exact bytes [`serialize`] would produce are accepted
//! - [`verify_at`] answers `false` for both expiry and signature mismatch
//!   without telling the caller which one applied
//! - Signatures are compared in constant time

use crate::errors::TokenError;
use crate::observability::metrics::{record_parse, record_serialization, record_verification};
use crate::packer::{self, PackedMessage};
use crate::token::{AccessToken, AppId, AppKey, APP_ID_LENGTH};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Token format revision understood by this codec.
pub const VERSION: &str = "001";

/// Width of the version tag, in bytes.
pub const VERSION_LENGTH: usize = VERSION.len();

/// Maximum accepted token size in bytes (8KB).
///
/// Typical tokens are a few hundred bytes. Anything larger is rejected
/// before base64 or JSON decoding allocates for it.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// The signed pair carried inside the base64 payload.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    msg: String,
    signature: String,
}

/// Sign `token` with its own key and encode it for transport.
///
/// The signature is stored on the token as a side effect.
///
/// # Errors
///
/// - `TokenError::MissingAppKey` if the token has no key (parsed tokens)
/// - `TokenError::Serialization` if JSON encoding fails
#[instrument(skip_all)]
pub fn serialize(token: &mut AccessToken) -> Result<String, TokenError> {
    let result = serialize_inner(token);
    record_serialization(if result.is_ok() { "success" } else { "error" });
    result
}

fn serialize_inner(token: &mut AccessToken) -> Result<String, TokenError> {
    let Some(app_key) = token.app_key() else {
        return Err(TokenError::MissingAppKey);
    };

    let packed = packer::pack(token)?;
    let signature = packer::sign(&packed, app_key);
    token.set_signature(signature.clone());

    let envelope = serde_json::to_string(&Envelope {
        msg: packed,
        signature,
    })?;
    let content = STANDARD.encode(envelope.as_bytes());

    let mut raw = String::with_capacity(VERSION_LENGTH + APP_ID_LENGTH + content.len());
    raw.push_str(VERSION);
    raw.push_str(token.app_id().as_str());
    raw.push_str(&content);

    tracing::debug!(
        target: "rtc_token",
        privileges = token.privileges().len(),
        expire_at = token.expire_at(),
        size = raw.len(),
        "Token serialized"
    );

    Ok(raw)
}

/// Decode a token string without verifying it.
///
/// The returned token has no app key and carries its signature untrusted;
/// call [`verify`] or [`verify_at`] before acting on it.
///
/// # Errors
///
/// - `TokenError::InvalidVersion` if the version prefix is not [`VERSION`]
/// - `TokenError::InvalidFormat` for any size, base64, JSON, app id or
///   privilege decoding failure, and for envelopes or messages that are not
///   byte-for-byte in the form [`serialize`] produces
#[instrument(skip_all)]
pub fn parse(raw: &str) -> Result<AccessToken, TokenError> {
    let result = parse_inner(raw);
    match &result {
        Ok(_) => record_parse("success", "none"),
        Err(TokenError::InvalidVersion) => record_parse("error", "version"),
        Err(_) => record_parse("error", "format"),
    }
    result
}

fn parse_inner(raw: &str) -> Result<AccessToken, TokenError> {
    if raw.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            target: "rtc_token",
            token_size = raw.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(TokenError::InvalidFormat);
    }

    if raw.get(..VERSION_LENGTH) != Some(VERSION) {
        tracing::debug!(target: "rtc_token", "Token rejected: version mismatch");
        return Err(TokenError::InvalidVersion);
    }

    let app_id_end = VERSION_LENGTH + APP_ID_LENGTH;
    let app_id = raw
        .get(VERSION_LENGTH..app_id_end)
        .ok_or_else(|| {
            tracing::debug!(target: "rtc_token", "Token rejected: app id segment missing");
            TokenError::InvalidFormat
        })
        .and_then(|segment| {
            AppId::new(segment).map_err(|e| {
                tracing::debug!(target: "rtc_token", error = %e, "Token rejected: invalid app id");
                TokenError::InvalidFormat
            })
        })?;

    let content = raw.get(app_id_end..).ok_or(TokenError::InvalidFormat)?;

    let envelope_bytes = STANDARD.decode(content).map_err(|e| {
        tracing::debug!(target: "rtc_token", error = %e, "Failed to decode envelope base64");
        TokenError::InvalidFormat
    })?;

    let envelope: Envelope = serde_json::from_slice(&envelope_bytes).map_err(|e| {
        tracing::debug!(target: "rtc_token", error = %e, "Failed to parse envelope JSON");
        TokenError::InvalidFormat
    })?;

    // Only the canonical encoding is accepted, so no two distinct strings
    // decode to the same signed token.
    let canonical_envelope =
        serde_json::to_vec(&envelope).map_err(|_| TokenError::InvalidFormat)?;
    if canonical_envelope != envelope_bytes {
        tracing::debug!(target: "rtc_token", "Token rejected: non-canonical envelope");
        return Err(TokenError::InvalidFormat);
    }

    let message: PackedMessage = packer::unpack(&envelope.msg).map_err(|e| {
        tracing::debug!(target: "rtc_token", error = %e, "Failed to parse message JSON");
        TokenError::InvalidFormat
    })?;

    let token = AccessToken::from_wire(
        app_id,
        message.room_id,
        message.user_id,
        message.issued_at,
        message.nonce,
        message.expire_at,
        message.privileges,
        envelope.signature,
    );

    let canonical_msg = packer::pack(&token).map_err(|_| TokenError::InvalidFormat)?;
    if canonical_msg != envelope.msg {
        tracing::debug!(target: "rtc_token", "Token rejected: non-canonical message");
        return Err(TokenError::InvalidFormat);
    }

    Ok(token)
}

/// Verify `token` with `app_key` against the current wall clock.
#[must_use]
pub fn verify(token: &AccessToken, app_key: &AppKey) -> bool {
    verify_at(token, app_key, chrono::Utc::now().timestamp())
}

/// Verify `token` with `app_key` at `now` (unix seconds).
///
/// Returns `false` when the envelope has expired (no signature work is done)
/// or when the recomputed signature does not match. Never mutates the token
/// and never fails; repeated calls give the same answer for the same `now`.
#[instrument(skip_all)]
#[must_use]
pub fn verify_at(token: &AccessToken, app_key: &AppKey, now: i64) -> bool {
    if token.is_expired_at(now) {
        tracing::debug!(
            target: "rtc_token",
            expire_at = token.expire_at(),
            now = now,
            "Token rejected: expired"
        );
        record_verification("invalid", "expired");
        return false;
    }

    let packed = match packer::pack(token) {
        Ok(packed) => packed,
        Err(e) => {
            tracing::debug!(target: "rtc_token", error = %e, "Token rejected: repack failed");
            record_verification("invalid", "signature");
            return false;
        }
    };

    if packer::verify_signature(&packed, app_key, token.signature()) {
        record_verification("valid", "none");
        true
    } else {
        tracing::debug!(target: "rtc_token", "Token rejected: signature mismatch");
        record_verification("invalid", "signature");
        false
    }
}
