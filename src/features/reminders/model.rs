//! Reminder records and time helpers
//!
//! - **Version**: 2.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.1.0: Fire times past year 9999 are never produced
//! - 2.0.0: Recurring reminders (repeat interval in minutes)
//! - 1.0.0: One-shot reminders with creator and target

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, SecondsFormat, Utc};
use chrono_tz::Tz;

/// Format used for local times shown to users
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M %Z";

/// A pending reminder as persisted in the `reminders` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: i64,
    pub creator_chat_id: i64,
    pub target_chat_id: i64,
    pub fire_at: DateTime<Utc>,
    pub message: String,
    /// Minutes between deliveries; `None` for one-shot reminders
    pub repeat_interval: Option<u32>,
}

/// Everything needed to create a reminder; the id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub creator_chat_id: i64,
    pub target_chat_id: i64,
    pub fire_at: DateTime<Utc>,
    pub message: String,
    pub repeat_interval: Option<u32>,
}

impl NewReminder {
    pub fn into_reminder(self, id: i64) -> Reminder {
        Reminder {
            id,
            creator_chat_id: self.creator_chat_id,
            target_chat_id: self.target_chat_id,
            fire_at: self.fire_at,
            message: self.message,
            repeat_interval: self.repeat_interval,
        }
    }
}

impl Reminder {
    pub fn is_recurring(&self) -> bool {
        self.repeat_interval.is_some()
    }

    /// Next fire time for a recurring reminder: `fire_at + interval`, never `now + interval`.
    ///
    /// `None` for one-shot reminders and when the next slot can't be stored.
    pub fn next_fire_at(&self) -> Option<DateTime<Utc>> {
        self.repeat_interval
            .and_then(|minutes| advance(self.fire_at, minutes))
    }

    /// Latest slot `fire_at + k * interval` that is still `<= now`.
    ///
    /// Used when a recurring reminder was missed while offline so it fires once
    /// instead of once per missed interval. Returns `fire_at` unchanged for
    /// one-shot reminders or when `fire_at` is not in the past.
    pub fn latest_missed_slot(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let Some(minutes) = self.repeat_interval else {
            return self.fire_at;
        };
        if self.fire_at >= now || minutes == 0 {
            return self.fire_at;
        }
        let step = i64::from(minutes) * 60;
        let behind = (now - self.fire_at).num_seconds();
        self.fire_at + Duration::seconds((behind / step) * step)
    }

    /// Fire time rendered in the configured local timezone
    pub fn local_time(&self, timezone: &Tz) -> String {
        format_local(self.fire_at, timezone)
    }
}

pub fn format_local(instant: DateTime<Utc>, timezone: &Tz) -> String {
    instant.with_timezone(timezone).format(DISPLAY_FORMAT).to_string()
}

/// Whether `instant` fits the four-digit-year `remind_at` format
pub fn is_storable(instant: DateTime<Utc>) -> bool {
    (0..=9999).contains(&instant.year())
}

/// `fire_at + minutes`, or `None` when the result leaves the storable range
pub fn advance(fire_at: DateTime<Utc>, minutes: u32) -> Option<DateTime<Utc>> {
    fire_at
        .checked_add_signed(Duration::minutes(i64::from(minutes)))
        .filter(|next| is_storable(*next))
}

/// Serialize an instant for the `remind_at` column.
///
/// Fixed-width RFC 3339 in UTC so that string comparison in SQL matches
/// chronological order.
pub fn to_storage(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn from_storage(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid remind_at value in database: '{raw}'"))?;
    Ok(parsed.with_timezone(&Utc))
}
