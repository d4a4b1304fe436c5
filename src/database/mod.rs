//! # Database
//!
//! SQLite persistence for contacts and pending reminders.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Split into contacts/reminders modules, `repeat_interval_minutes` migration
//! - 1.0.0: Initial contacts and reminders tables

mod contacts;
mod reminders;
mod schema;

pub use contacts::Contact;

use anyhow::{Context, Result};
use log::info;
use sqlite::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to the bot database
///
/// Cloning is cheap; all clones share one connection guarded by a mutex, so
/// every method runs as a single serialized statement.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and apply migrations
    pub async fn new(path: &str) -> Result<Self> {
        let connection =
            sqlite::open(path).with_context(|| format!("Failed to open database at {path}"))?;
        let database = Self::from_connection(connection)?;
        info!("💾 Database ready at {path}");
        Ok(database)
    }

    /// Fresh in-memory database, used by tests
    pub fn in_memory() -> Result<Self> {
        let connection = sqlite::open(":memory:").context("Failed to open in-memory database")?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        schema::migrate(&connection)?;
        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}
