//! Helpers for taking raw token strings apart and forging new ones.
//!
//! Negative tests need tokens that are well-formed on the wire but carry a
//! message or signature the issuer never produced.

use base64::{engine::general_purpose::STANDARD, Engine};
use rtc_token::{APP_ID_LENGTH, VERSION};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Token too short to carry a header")]
    TooShort,

    #[error("Envelope decode failed: {0}")]
    Envelope(String),
}

/// Decoded parts of a raw token string.
#[derive(Debug, Clone)]
pub struct RawParts {
    pub version: String,
    pub app_id: String,
    /// The packed message exactly as it was signed.
    pub msg: String,
    pub signature: String,
}

/// Split a raw token into header and decoded envelope.
pub fn split_raw_token(raw: &str) -> Result<RawParts, WireError> {
    let header = VERSION.len() + APP_ID_LENGTH;
    let version = raw.get(..VERSION.len()).ok_or(WireError::TooShort)?;
    let app_id = raw.get(VERSION.len()..header).ok_or(WireError::TooShort)?;
    let content = raw.get(header..).ok_or(WireError::TooShort)?;

    let bytes = STANDARD
        .decode(content)
        .map_err(|e| WireError::Envelope(e.to_string()))?;
    let envelope: Value =
        serde_json::from_slice(&bytes).map_err(|e| WireError::Envelope(e.to_string()))?;

    let field = |name: &str| {
        envelope
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| WireError::Envelope(format!("missing '{name}'")))
    };

    Ok(RawParts {
        version: version.to_owned(),
        app_id: app_id.to_owned(),
        msg: field("msg")?,
        signature: field("signature")?,
    })
}

/// Assemble a raw token from arbitrary parts. Nothing is validated or signed.
pub fn encode_raw_token(version: &str, app_id: &str, msg: &str, signature: &str) -> String {
    let envelope = json!({ "msg": msg, "signature": signature }).to_string();
    format!("{version}{app_id}{}", STANDARD.encode(envelope))
}

/// Re-encode `raw` with `edit` applied to its packed message, keeping the
/// original signature.
///
/// The message is re-emitted with its keys sorted, so the result is never in
/// canonical field order and the codec rejects it as malformed.
pub fn forge_message(raw: &str, edit: impl FnOnce(&mut Value)) -> Result<String, WireError> {
    let parts = split_raw_token(raw)?;
    let mut msg: Value =
        serde_json::from_str(&parts.msg).map_err(|e| WireError::Envelope(e.to_string()))?;
    edit(&mut msg);
    Ok(encode_raw_token(
        &parts.version,
        &parts.app_id,
        &msg.to_string(),
        &parts.signature,
    ))
}
