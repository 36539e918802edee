//! `token-tool`: issue, inspect and verify RTC access tokens.
//!
//! Credentials come from `RTC_APP_ID` and `RTC_APP_KEY`; keys are never
//! accepted as command-line arguments.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::config::LogConfig;
use config::ToolConfig;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "token-tool", version, about = "RTC access token utility")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue a room token and print it
    Issue {
        #[arg(long)]
        room: String,

        #[arg(long)]
        user: String,

        /// Publish window in seconds (overrides RTC_PUBLISH_TTL_SECONDS)
        #[arg(long)]
        publish_ttl: Option<u64>,

        /// Token lifetime in seconds (overrides RTC_TOKEN_TTL_SECONDS)
        #[arg(long)]
        token_ttl: Option<u64>,

        /// Subscribe window in seconds (overrides RTC_SUBSCRIBE_TTL_SECONDS)
        #[arg(long)]
        subscribe_ttl: Option<u64>,
    },

    /// Print the fields of a token without verifying it
    Inspect { token: String },

    /// Verify a token with RTC_APP_KEY; exits 1 if it is invalid
    Verify {
        token: String,

        /// Unix time to verify at instead of the current time
        #[arg(long, env = "RTC_VERIFY_AT")]
        at: Option<i64>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env().context("invalid logging configuration")?;
    common::logging::init(&log_config).context("failed to initialise logging")?;

    let config = ToolConfig::from_env().context("invalid configuration")?;
    let now = chrono::Utc::now().timestamp();

    match cli.command {
        Command::Issue {
            room,
            user,
            publish_ttl,
            token_ttl,
            subscribe_ttl,
        } => {
            let mut policy = config.policy;
            if let Some(secs) = publish_ttl {
                policy.publish_ttl = Duration::from_secs(secs);
            }
            if let Some(secs) = token_ttl {
                policy.token_ttl = Duration::from_secs(secs);
            }
            if let Some(secs) = subscribe_ttl {
                policy.subscribe_ttl = Some(Duration::from_secs(secs));
            }

            let raw = commands::issue(&config, &room, &user, &policy, now)?;
            println!("{raw}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { token } => {
            print!("{}", commands::inspect(&token)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { token, at } => {
            if commands::verify(&config, &token, at.unwrap_or(now))? {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
