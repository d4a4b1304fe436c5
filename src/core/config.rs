//! Runtime configuration loaded from the environment
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Timezone, missed-reminder and rate limit settings
//! - 1.0.0: Token, database path and admin id

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use std::time::Duration;

const DEFAULT_DATABASE_PATH: &str = "reminders.db";
const DEFAULT_COMMAND_PREFIX: &str = "/";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_RATE_LIMIT_MAX: usize = 10;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Immutable process configuration, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub database_path: String,
    admin_chat_id: Option<i64>,
    pub timezone: Tz,
    pub command_prefix: String,
    pub deliver_missed: bool,
    pub rate_limit_max: usize,
    pub rate_limit_window: Duration,
    pub log_level: String,
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let discord_token =
            get("DISCORD_TOKEN").ok_or_else(|| anyhow!("DISCORD_TOKEN is not set"))?;

        let admin_chat_id = match get("ADMIN_CHAT_ID") {
            Some(raw) => {
                let id: i64 = raw
                    .parse()
                    .with_context(|| format!("ADMIN_CHAT_ID must be an integer, got '{raw}'"))?;
                (id != 0).then_some(id)
            }
            None => None,
        };

        let timezone = match get("REMINDER_TIMEZONE") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|e| anyhow!("Invalid REMINDER_TIMEZONE '{raw}': {e}"))?,
            None => Tz::UTC,
        };

        let deliver_missed = match get("DELIVER_MISSED_REMINDERS") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("DELIVER_MISSED_REMINDERS must be true/false, got '{raw}'"))?,
            None => true,
        };

        let rate_limit_max = match get("RATE_LIMIT_MAX_COMMANDS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("RATE_LIMIT_MAX_COMMANDS must be a number, got '{raw}'"))?,
            None => DEFAULT_RATE_LIMIT_MAX,
        };

        let rate_limit_window = match get("RATE_LIMIT_WINDOW_SECONDS") {
            Some(raw) => Duration::from_secs(raw.parse().with_context(|| {
                format!("RATE_LIMIT_WINDOW_SECONDS must be a number, got '{raw}'")
            })?),
            None => Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        };

        Ok(Config {
            discord_token,
            database_path: get("REMINDER_DB").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            admin_chat_id,
            timezone,
            command_prefix: get("COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
            deliver_missed,
            rate_limit_max,
            rate_limit_window,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Administrator chat id, `None` when admin commands are disabled
    pub fn admin_chat_id(&self) -> Option<i64> {
        self.admin_chat_id
    }

    pub fn is_admin(&self, chat_id: i64) -> bool {
        self.admin_chat_id == Some(chat_id)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
