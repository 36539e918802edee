//! Command implementations, kept free of process I/O so they can be tested.

use crate::config::ToolConfig;
use anyhow::{Context, Result};
use rtc_token::{issue_room_token, AccessToken, IssuePolicy};
use std::fmt::Write as _;

/// Issue a stock room token at `now`.
pub fn issue(
    config: &ToolConfig,
    room_id: &str,
    user_id: &str,
    policy: &IssuePolicy,
    now: i64,
) -> Result<String> {
    let app_id = config.app_id()?.clone();
    let app_key = config.app_key()?.clone();

    issue_room_token(app_id, app_key, room_id, user_id, policy, now)
        .context("failed to serialize token")
}

/// Decode `raw` and render its fields, one per line. No key is needed and
/// the signature is not checked.
pub fn inspect(raw: &str) -> Result<String> {
    let token = AccessToken::parse(raw.trim()).context("failed to parse token")?;

    let mut out = String::new();
    writeln!(out, "app_id:     {}", token.app_id())?;
    writeln!(out, "room_id:    {}", token.room_id())?;
    writeln!(out, "user_id:    {}", token.user_id())?;
    writeln!(out, "issued_at:  {}", render_time(token.issued_at()))?;
    writeln!(out, "expire_at:  {}", render_time(token.expire_at()))?;
    writeln!(out, "nonce:      {}", token.nonce())?;
    writeln!(out, "privileges:")?;
    for (privilege, expire_at) in token.privileges().iter() {
        writeln!(
            out,
            "  {} ({}): {}",
            privilege,
            privilege.code(),
            render_time(expire_at)
        )?;
    }
    Ok(out)
}

/// Parse and verify `raw` with the configured key at `now`.
///
/// Malformed tokens are reported as invalid rather than as errors; only a
/// missing key is an error.
pub fn verify(config: &ToolConfig, raw: &str, now: i64) -> Result<bool> {
    let app_key = config.app_key()?;

    match AccessToken::parse(raw.trim()) {
        Ok(token) => Ok(token.verify_at(app_key, now)),
        Err(e) => {
            tracing::debug!(error = %e, "Token did not parse");
            Ok(false)
        }
    }
}

fn render_time(timestamp: i64) -> String {
    if timestamp == 0 {
        return "never".to_string();
    }
    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(at) => format!("{timestamp} ({})", at.to_rfc3339()),
        None => timestamp.to_string(),
    }
}
