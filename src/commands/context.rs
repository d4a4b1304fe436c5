//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Database, scheduler and config only
//! - 1.0.0: Initial implementation with core shared state

use std::sync::Arc;

use super::error::CommandError;
use crate::core::Config;
use crate::database::Database;
use crate::features::reminders::ReminderScheduler;

/// Shared context for all command handlers
#[derive(Clone)]
pub struct CommandContext {
    pub database: Database,
    pub scheduler: ReminderScheduler,
    pub config: Arc<Config>,
}

impl CommandContext {
    pub fn new(database: Database, scheduler: ReminderScheduler, config: Arc<Config>) -> Self {
        Self {
            database,
            scheduler,
            config,
        }
    }

    /// Reject unless `chat_id` is the configured administrator
    pub fn require_admin(&self, chat_id: i64) -> Result<(), CommandError> {
        if self.config.is_admin(chat_id) {
            Ok(())
        } else {
            Err(CommandError::Permission)
        }
    }

    /// Command word with the configured prefix, for replies
    pub fn cmd(&self, name: &str) -> String {
        format!("{}{name}", self.config.command_prefix)
    }
}
