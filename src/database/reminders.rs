//! Reminder store: pending reminders only

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use sqlite::{State, Statement};

use super::Database;
use crate::features::reminders::model::{
    from_storage, is_storable, to_storage, NewReminder, Reminder,
};

const REMINDER_COLUMNS: &str =
    "id, creator_chat_id, target_chat_id, remind_at, message, repeat_interval_minutes";

fn reminder_from_row(statement: &Statement<'_>) -> Result<Reminder> {
    let remind_at: String = statement.read("remind_at")?;
    let repeat_interval = statement
        .read::<Option<i64>, _>("repeat_interval_minutes")?
        .and_then(|minutes| u32::try_from(minutes).ok())
        .filter(|minutes| *minutes > 0);

    Ok(Reminder {
        id: statement.read("id")?,
        creator_chat_id: statement.read("creator_chat_id")?,
        target_chat_id: statement.read("target_chat_id")?,
        fire_at: from_storage(&remind_at)?,
        message: statement.read("message")?,
        repeat_interval,
    })
}

/// `remind_at` value for `instant`; refuses instants that would not read back
fn storage_value(instant: DateTime<Utc>) -> Result<String> {
    if !is_storable(instant) {
        bail!("Reminder time {instant} is outside the storable range");
    }
    Ok(to_storage(instant))
}

fn collect_reminders(statement: &mut Statement<'_>) -> Result<Vec<Reminder>> {
    let mut reminders = Vec::new();
    while let State::Row = statement.next()? {
        reminders.push(reminder_from_row(statement)?);
    }
    Ok(reminders)
}

impl Database {
    /// Persist a new reminder and return its generated id
    pub async fn create_reminder(&self, reminder: &NewReminder) -> Result<i64> {
        let remind_at = storage_value(reminder.fire_at)?;
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "INSERT INTO reminders
                (creator_chat_id, target_chat_id, remind_at, message, repeat_interval_minutes)
             VALUES (?, ?, ?, ?, ?)",
        )?;
        statement.bind((1, reminder.creator_chat_id))?;
        statement.bind((2, reminder.target_chat_id))?;
        statement.bind((3, remind_at.as_str()))?;
        statement.bind((4, reminder.message.as_str()))?;
        statement.bind((5, reminder.repeat_interval.map(i64::from)))?;
        while statement.next()? != State::Done {}
        drop(statement);

        let mut last_id = connection.prepare("SELECT last_insert_rowid() AS id")?;
        last_id.next()?;
        Ok(last_id.read::<i64, _>("id")?)
    }

    pub async fn get_reminder(&self, id: i64) -> Result<Option<Reminder>> {
        let connection = self.connection.lock().await;
        let mut statement =
            connection.prepare(format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?"))?;
        statement.bind((1, id))?;
        match statement.next()? {
            State::Row => Ok(Some(reminder_from_row(&statement)?)),
            State::Done => Ok(None),
        }
    }

    /// Reminders strictly after `now`, soonest first (startup recovery)
    pub async fn list_future_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE remind_at > ? ORDER BY remind_at, id"
        ))?;
        statement.bind((1, to_storage(now).as_str()))?;
        collect_reminders(&mut statement)
    }

    /// Reminders at or before `now` that never fired, oldest first
    pub async fn list_overdue_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE remind_at <= ? ORDER BY remind_at, id"
        ))?;
        statement.bind((1, to_storage(now).as_str()))?;
        collect_reminders(&mut statement)
    }

    pub async fn list_reminders_by_creator(&self, creator_chat_id: i64) -> Result<Vec<Reminder>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE creator_chat_id = ? ORDER BY remind_at, id"
        ))?;
        statement.bind((1, creator_chat_id))?;
        collect_reminders(&mut statement)
    }

    pub async fn list_all_reminders(&self) -> Result<Vec<Reminder>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders ORDER BY remind_at, id"
        ))?;
        collect_reminders(&mut statement)
    }

    /// Move a reminder to its next fire time; no-op if it was cancelled meanwhile
    pub async fn update_reminder_fire_time(&self, id: i64, fire_at: DateTime<Utc>) -> Result<()> {
        let remind_at = storage_value(fire_at)?;
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare("UPDATE reminders SET remind_at = ? WHERE id = ?")?;
        statement.bind((1, remind_at.as_str()))?;
        statement.bind((2, id))?;
        while statement.next()? != State::Done {}
        Ok(())
    }

    /// Delete a reminder; deleting an unknown id is not an error
    pub async fn delete_reminder(&self, id: i64) -> Result<()> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare("DELETE FROM reminders WHERE id = ?")?;
        statement.bind((1, id))?;
        while statement.next()? != State::Done {}
        Ok(())
    }
}
