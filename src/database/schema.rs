//! Table definitions and additive migrations

use anyhow::Result;
use log::info;
use sqlite::{Connection, State};

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chat_id INTEGER UNIQUE NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reminders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    creator_chat_id INTEGER NOT NULL,
    target_chat_id INTEGER NOT NULL,
    remind_at TEXT NOT NULL,
    message TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS reminders_remind_at_idx ON reminders(remind_at);
CREATE INDEX IF NOT EXISTS reminders_creator_idx ON reminders(creator_chat_id);
";

/// Create missing tables, then bring older databases up to the current columns
pub(super) fn migrate(connection: &Connection) -> Result<()> {
    connection.execute(CREATE_TABLES)?;
    ensure_column(connection, "reminders", "repeat_interval_minutes", "INTEGER")?;
    connection.execute(NORMALIZE_LEGACY_TIMES)?;
    Ok(())
}

/// Older rows carry `+00:00` offsets; rewrite them to the `Z` form so that
/// string comparison stays chronological across old and new rows.
const NORMALIZE_LEGACY_TIMES: &str = "
UPDATE reminders
SET remind_at = substr(remind_at, 1, 19) || 'Z'
WHERE remind_at LIKE '____-__-__T__:__:__+00:00';
";

/// Add `column` to `table` unless it already exists. Existing rows get NULL.
pub(super) fn ensure_column(
    connection: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<bool> {
    if has_column(connection, table, column)? {
        return Ok(false);
    }
    connection.execute(format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"))?;
    info!("🛠️ Migrated table {table}: added column {column}");
    Ok(true)
}

fn has_column(connection: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut statement = connection.prepare(format!("PRAGMA table_info({table})"))?;
    while let State::Row = statement.next()? {
        let name: String = statement.read("name")?;
        if name.eq_ignore_ascii_case(column) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const LEGACY_REMINDERS: &str = "
        CREATE TABLE reminders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            creator_chat_id INTEGER NOT NULL,
            target_chat_id INTEGER NOT NULL,
            remind_at TEXT NOT NULL,
            message TEXT NOT NULL
        );
        INSERT INTO reminders (creator_chat_id, target_chat_id, remind_at, message)
        VALUES (1, 2, '2030-01-01T09:00:00+00:00', 'legacy');
    ";

    #[test]
    fn test_migrate_is_idempotent() {
        let connection = sqlite::open(":memory:").unwrap();
        migrate(&connection).unwrap();
        migrate(&connection).unwrap();
        assert!(has_column(&connection, "reminders", "repeat_interval_minutes").unwrap());
    }

    #[test]
    fn test_legacy_rows_survive_column_addition() {
        let connection = sqlite::open(":memory:").unwrap();
        connection.execute(LEGACY_REMINDERS).unwrap();
        assert!(!has_column(&connection, "reminders", "repeat_interval_minutes").unwrap());

        migrate(&connection).unwrap();

        let mut statement = connection
            .prepare("SELECT message, repeat_interval_minutes FROM reminders")
            .unwrap();
        assert_eq!(statement.next().unwrap(), State::Row);
        assert_eq!(statement.read::<String, _>("message").unwrap(), "legacy");
        assert_eq!(
            statement
                .read::<Option<i64>, _>("repeat_interval_minutes")
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_legacy_offset_times_read_back_after_migration() {
        let connection = sqlite::open(":memory:").unwrap();
        connection.execute(LEGACY_REMINDERS).unwrap();

        let db = super::super::Database::from_connection(connection).unwrap();

        let reminder = db.get_reminder(1).await.unwrap().unwrap();
        assert_eq!(
            reminder.fire_at,
            Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(reminder.repeat_interval, None);

        let before = Utc.with_ymd_and_hms(2029, 12, 31, 9, 0, 0).unwrap();
        let future = db.list_future_reminders(before).await.unwrap();
        assert_eq!(future.len(), 1);

        let connection = db.connection.lock().await;
        let mut statement = connection.prepare("SELECT remind_at FROM reminders").unwrap();
        assert_eq!(statement.next().unwrap(), State::Row);
        assert_eq!(
            statement.read::<String, _>("remind_at").unwrap(),
            "2030-01-01T09:00:00Z"
        );
    }

    #[test]
    fn test_ensure_column_reports_addition_once() {
        let connection = sqlite::open(":memory:").unwrap();
        connection.execute(LEGACY_REMINDERS).unwrap();
        assert!(ensure_column(&connection, "reminders", "note", "TEXT").unwrap());
        assert!(!ensure_column(&connection, "reminders", "note", "TEXT").unwrap());
    }
}
