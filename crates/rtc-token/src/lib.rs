//! RTC access tokens.
//!
//! Compact, versioned, HMAC-SHA256 signed capability tokens that let a user
//! publish or subscribe in one room for a bounded time, verified without a
//! call to an authorization server.
//!
//! # Modules
//!
//! - `privilege` - Grantable privileges and aggregate expansion rules
//! - `token` - The token, its application id and key types
//! - `packer` - Canonical packing and HMAC signing
//! - `codec` - Wire encoding, parsing and verification
//! - `issuer` - Stock room-join issuance
//! - `errors` - Error types
//! - `observability` - Metrics hooks
//!
//! # Example
//!
//! ```rust
//! use rtc_token::{AccessToken, AppId, AppKey, Privilege};
//!
//! let app_id = AppId::new("68afed4e18ee8d017b08325f")?;
//! let app_key = AppKey::try_from("server-side-secret")?;
//! let now = chrono::Utc::now().timestamp();
//!
//! let mut token = AccessToken::new(app_id, app_key.clone(), "123456", "alice");
//! token.add_privilege(Privilege::SubscribeStream, 0);
//! token.add_privilege(Privilege::PublishStream, now + 3600);
//! token.expire_time(now + 7200);
//! let raw = token.serialize()?;
//!
//! let parsed = AccessToken::parse(&raw)?;
//! assert!(parsed.verify(&app_key));
//! # Ok::<(), rtc_token::TokenError>(())
//! ```

#![warn(clippy::pedantic)]

pub mod codec;
pub mod errors;
pub mod issuer;
pub mod observability;
pub mod packer;
pub mod privilege;
pub mod token;

pub use codec::{MAX_TOKEN_SIZE_BYTES, VERSION};
pub use errors::TokenError;
pub use issuer::{issue_room_token, IssuePolicy};
pub use privilege::{Privilege, PrivilegeSet};
pub use token::{AccessToken, AppId, AppKey, APP_ID_LENGTH};
