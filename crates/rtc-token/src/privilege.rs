//! Grantable privileges and the rules that expand aggregate grants.
//!
//! Each privilege has a stable integer code that appears on the wire as the
//! decimal key of the `privileges` object. Aggregate privileges are expanded
//! through [`IMPLIED_PRIVILEGES`]; adding a new aggregate only touches that
//! table.

use crate::errors::TokenError;
use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A grantable capability inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Privilege {
    /// Aggregate: publish every kind of stream
    PublishStream = 0,
    /// Publish an audio stream
    PublishAudioStream = 1,
    /// Publish a video stream
    PublishVideoStream = 2,
    /// Publish a data stream
    PublishDataStream = 3,
    /// Subscribe to streams published by others
    SubscribeStream = 4,
}

/// Aggregate privileges and the constituents granted alongside them with the
/// same expiry.
pub const IMPLIED_PRIVILEGES: &[(Privilege, &[Privilege])] = &[(
    Privilege::PublishStream,
    &[
        Privilege::PublishAudioStream,
        Privilege::PublishVideoStream,
        Privilege::PublishDataStream,
    ],
)];

impl Privilege {
    /// Every privilege, in code order.
    pub const ALL: [Privilege; 5] = [
        Privilege::PublishStream,
        Privilege::PublishAudioStream,
        Privilege::PublishVideoStream,
        Privilege::PublishDataStream,
        Privilege::SubscribeStream,
    ];

    /// Wire code of this privilege.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Privileges implied by granting `self`. Empty for non-aggregates.
    #[must_use]
    pub fn implied(self) -> &'static [Privilege] {
        for (aggregate, implied) in IMPLIED_PRIVILEGES {
            if *aggregate == self {
                return *implied;
            }
        }
        &[]
    }

    /// Lower-snake name used in CLI arguments and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Privilege::PublishStream => "publish_stream",
            Privilege::PublishAudioStream => "publish_audio_stream",
            Privilege::PublishVideoStream => "publish_video_stream",
            Privilege::PublishDataStream => "publish_data_stream",
            Privilege::SubscribeStream => "subscribe_stream",
        }
    }
}

impl TryFrom<u8> for Privilege {
    type Error = TokenError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Privilege::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or(TokenError::UnknownPrivilege(code))
    }
}

impl From<Privilege> for u8 {
    fn from(privilege: Privilege) -> Self {
        privilege.code()
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privilege {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Privilege::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| format!("unknown privilege '{s}'"))
    }
}

/// Privileges granted by a token, each with its own expiry.
///
/// An expiry of `0` means the privilege carries no expiry of its own and is
/// valid for as long as the token envelope is. A non-zero expiry `E` allows
/// the action while `now <= E`.
///
/// On the wire the set is an object keyed by the decimal privilege code,
/// always emitted in ascending code order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeSet {
    entries: BTreeMap<Privilege, i64>,
}

impl PrivilegeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `privilege` until `expire_at`, overwriting any previous entry.
    ///
    /// Privileges implied by `privilege` are set to the same expiry, also
    /// overwriting whatever they held before.
    pub fn grant(&mut self, privilege: Privilege, expire_at: i64) {
        self.entries.insert(privilege, expire_at);
        for implied in privilege.implied() {
            self.entries.insert(*implied, expire_at);
        }
    }

    /// Expiry recorded for `privilege`, if granted.
    #[must_use]
    pub fn expiry(&self, privilege: Privilege) -> Option<i64> {
        self.entries.get(&privilege).copied()
    }

    #[must_use]
    pub fn contains(&self, privilege: Privilege) -> bool {
        self.entries.contains_key(&privilege)
    }

    /// Whether `privilege` is granted and not past its own expiry at `now`.
    #[must_use]
    pub fn allows(&self, privilege: Privilege, now: i64) -> bool {
        match self.expiry(privilege) {
            Some(0) => true,
            Some(expire_at) => now <= expire_at,
            None => false,
        }
    }

    /// Entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (Privilege, i64)> + '_ {
        self.entries.iter().map(|(p, e)| (*p, *e))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PrivilegeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (privilege, expire_at) in &self.entries {
            map.serialize_entry(&privilege.code().to_string(), expire_at)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PrivilegeSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, i64>::deserialize(deserializer)?;
        let mut entries = BTreeMap::new();
        for (key, expire_at) in raw {
            let code: u8 = key
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid privilege key '{key}'")))?;
            let privilege = Privilege::try_from(code).map_err(D::Error::custom)?;
            // No cascade here: the wire form is already denormalized.
            entries.insert(privilege, expire_at);
        }
        Ok(Self { entries })
    }
}
