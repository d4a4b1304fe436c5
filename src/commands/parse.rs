//! Argument parsing and validation for reminder commands
//!
//! - **Version**: 1.2.0
//! - **Since**: 4.0.0
//!
//! ## Changelog
//! - 1.2.0: Reject fire times and repeats past year 9999
//! - 1.1.0: Repeat intervals
//! - 1.0.0: Local date/time parsing in the configured timezone

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::CommandError;
use crate::features::reminders::model::{advance, is_storable};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Turn `YYYY-MM-DD` + `HH:MM` in `timezone` into an instant strictly after `now`.
///
/// An ambiguous local time (clocks turned back) resolves to the earlier
/// instant; a local time skipped by a DST jump is rejected.
pub fn parse_fire_at(
    date: &str,
    time: &str,
    timezone: &Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, CommandError> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
        CommandError::Validation(format!("Can't parse date `{date}`. Use YYYY-MM-DD."))
    })?;
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|_| {
        CommandError::Validation(format!("Can't parse time `{time}`. Use HH:MM."))
    })?;

    let local = date.and_time(time);
    let fire_at = timezone
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| {
            CommandError::Validation(format!(
                "{} doesn't exist in {timezone} (daylight saving jump).",
                local.format("%Y-%m-%d %H:%M")
            ))
        })?
        .with_timezone(&Utc);

    if !is_storable(fire_at) {
        return Err(CommandError::Validation(
            "That date is too far in the future.".to_string(),
        ));
    }
    if fire_at <= now {
        return Err(CommandError::Validation(
            "The reminder time must be in the future.".to_string(),
        ));
    }
    Ok(fire_at)
}

/// Positive whole number of minutes
pub fn parse_interval(raw: &str) -> Result<u32, CommandError> {
    match raw.parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(CommandError::Validation(format!(
            "Interval `{raw}` must be a positive number of minutes."
        ))),
    }
}

/// A recurring reminder needs at least one more slot after `fire_at`
pub fn check_repeat(fire_at: DateTime<Utc>, minutes: u32) -> Result<(), CommandError> {
    match advance(fire_at, minutes) {
        Some(_) => Ok(()),
        None => Err(CommandError::Validation(
            "That reminder would repeat past the year 9999.".to_string(),
        )),
    }
}

/// Join trailing arguments into the reminder text; must not be blank
pub fn parse_message(parts: &[String]) -> Result<String, CommandError> {
    let message = parts.join(" ").trim().to_string();
    if message.is_empty() {
        return Err(CommandError::Validation(
            "The reminder text can't be empty.".to_string(),
        ));
    }
    Ok(message)
}

pub fn parse_reminder_id(raw: &str) -> Result<i64, CommandError> {
    raw.trim_start_matches('#')
        .parse::<i64>()
        .map_err(|_| CommandError::Validation(format!("`{raw}` is not a reminder id.")))
}
