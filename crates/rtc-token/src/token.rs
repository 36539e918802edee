//! The access token and its identity types.
//!
//! An [`AccessToken`] is built on the issuing side with an [`AppKey`], given
//! privileges and an envelope expiry, then serialized. A parsed token never
//! carries a key: verifiers supply theirs to [`AccessToken::verify`].

use crate::codec;
use crate::errors::TokenError;
use crate::privilege::{Privilege, PrivilegeSet};
use common::secret::{ExposeSecret, SecretString};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Width of the application id on the wire, in bytes.
pub const APP_ID_LENGTH: usize = 24;

/// Nonces are drawn from `0..MAX_NONCE`.
pub const MAX_NONCE: u32 = 1_000_000_000;

/// Draw a nonce from the thread-local CSPRNG.
#[must_use]
pub fn random_nonce() -> u32 {
    rand::thread_rng().gen_range(0..MAX_NONCE)
}

/// Public identifier of the issuing application.
///
/// Always exactly [`APP_ID_LENGTH`] ASCII characters, so the wire codec can
/// slice it positionally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppId(String);

impl AppId {
    /// Validate and wrap an application id.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidAppId` unless `value` is exactly
    /// [`APP_ID_LENGTH`] ASCII characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TokenError> {
        let value = value.into();
        if value.len() != APP_ID_LENGTH || !value.is_ascii() {
            return Err(TokenError::InvalidAppId {
                expected: APP_ID_LENGTH,
                length: value.chars().count(),
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AppId {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared secret used to sign and verify tokens.
///
/// Keys live only in trusted issuing or verifying services. Each token or
/// verify call receives its key explicitly; nothing in this crate keeps a
/// key in module-level state.
#[derive(Clone)]
pub struct AppKey(SecretString);

impl AppKey {
    /// Wrap a secret key.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::EmptyAppKey` for an empty key.
    pub fn new(key: SecretString) -> Result<Self, TokenError> {
        if key.expose_secret().is_empty() {
            return Err(TokenError::EmptyAppKey);
        }
        Ok(Self(key))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl TryFrom<&str> for AppKey {
    type Error = TokenError;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        Self::new(SecretString::from(key))
    }
}

impl TryFrom<String> for AppKey {
    type Error = TokenError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        Self::new(SecretString::from(key))
    }
}

impl fmt::Debug for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppKey([REDACTED])")
    }
}

/// A room-scoped capability token.
#[derive(Clone)]
pub struct AccessToken {
    app_id: AppId,
    app_key: Option<AppKey>,
    room_id: String,
    user_id: String,
    issued_at: i64,
    nonce: u32,
    expire_at: i64,
    privileges: PrivilegeSet,
    signature: String,
}

impl AccessToken {
    /// Create a token issued now with a fresh random nonce.
    #[must_use]
    pub fn new(
        app_id: AppId,
        app_key: AppKey,
        room_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        let issued_at = chrono::Utc::now().timestamp();
        Self::new_at(app_id, app_key, room_id, user_id, issued_at, random_nonce())
    }

    /// Create a token with an explicit issue time and nonce.
    ///
    /// For issuers that run on their own clock, and for reproducible tests.
    #[must_use]
    pub fn new_at(
        app_id: AppId,
        app_key: AppKey,
        room_id: impl Into<String>,
        user_id: impl Into<String>,
        issued_at: i64,
        nonce: u32,
    ) -> Self {
        Self {
            app_id,
            app_key: Some(app_key),
            room_id: room_id.into(),
            user_id: user_id.into(),
            issued_at,
            nonce,
            expire_at: 0,
            privileges: PrivilegeSet::new(),
            signature: String::new(),
        }
    }

    /// Rebuild a token decoded from the wire. The signature is carried
    /// untrusted and there is no key.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_wire(
        app_id: AppId,
        room_id: String,
        user_id: String,
        issued_at: i64,
        nonce: u32,
        expire_at: i64,
        privileges: PrivilegeSet,
        signature: String,
    ) -> Self {
        Self {
            app_id,
            app_key: None,
            room_id,
            user_id,
            issued_at,
            nonce,
            expire_at,
            privileges,
            signature,
        }
    }

    /// Grant `privilege` until `expire_at` (`0` = no per-privilege expiry).
    ///
    /// Granting [`Privilege::PublishStream`] also grants the audio, video
    /// and data publish privileges with the same expiry.
    pub fn add_privilege(&mut self, privilege: Privilege, expire_at: i64) {
        self.privileges.grant(privilege, expire_at);
    }

    /// Set the envelope expiry (`0` = the envelope never expires).
    pub fn expire_time(&mut self, expire_at: i64) {
        self.expire_at = expire_at;
    }

    #[must_use]
    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    /// The signing key. `None` for tokens produced by [`AccessToken::parse`].
    #[must_use]
    pub fn app_key(&self) -> Option<&AppKey> {
        self.app_key.as_ref()
    }

    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn issued_at(&self) -> i64 {
        self.issued_at
    }

    #[must_use]
    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    #[must_use]
    pub fn expire_at(&self) -> i64 {
        self.expire_at
    }

    #[must_use]
    pub fn privileges(&self) -> &PrivilegeSet {
        &self.privileges
    }

    /// Base64 HMAC tag; empty until the token is serialized.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub(crate) fn set_signature(&mut self, signature: String) {
        self.signature = signature;
    }

    /// Whether the envelope is past its expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expire_at > 0 && now > self.expire_at
    }

    /// Whether the token grants `privilege` at `now`, honouring both the
    /// envelope and the per-privilege expiry.
    ///
    /// This does not check the signature. Call it on verified tokens only.
    #[must_use]
    pub fn allows(&self, privilege: Privilege, now: i64) -> bool {
        !self.is_expired_at(now) && self.privileges.allows(privilege, now)
    }

    /// Sign the token and encode it for transport. See [`codec::serialize`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::MissingAppKey` for parsed tokens, which have no key.
    pub fn serialize(&mut self) -> Result<String, TokenError> {
        codec::serialize(self)
    }

    /// Decode a token string. See [`codec::parse`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidVersion` or `TokenError::InvalidFormat`.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        codec::parse(raw)
    }

    /// Verify against the current wall clock. See [`codec::verify`].
    #[must_use]
    pub fn verify(&self, app_key: &AppKey) -> bool {
        codec::verify(self, app_key)
    }

    /// Verify against an explicit `now`. See [`codec::verify_at`].
    #[must_use]
    pub fn verify_at(&self, app_key: &AppKey, now: i64) -> bool {
        codec::verify_at(self, app_key, now)
    }
}

/// User identifiers and key material are redacted.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("app_id", &self.app_id)
            .field("app_key", &self.app_key)
            .field("room_id", &self.room_id)
            .field("user_id", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("nonce", &self.nonce)
            .field("expire_at", &self.expire_at)
            .field("privileges", &self.privileges)
            .field("signature", &"[REDACTED]")
            .finish()
    }
}
