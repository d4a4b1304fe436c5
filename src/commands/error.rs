//! Handler-level errors and their chat replies
//!
//! - **Version**: 1.0.0
//! - **Since**: 4.0.0

use thiserror::Error;

/// Why a command was rejected.
///
/// Everything except `Storage` is an expected, user-facing rejection that
/// leaves persisted state untouched.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("administrator only")]
    Permission,

    /// Wrong number of arguments; carries the usage line without prefix
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type CommandResult = Result<String, CommandError>;

impl CommandError {
    /// Text sent back to the chat for this rejection
    pub fn user_message(&self, prefix: &str) -> String {
        match self {
            CommandError::Validation(reason) | CommandError::NotFound(reason) => {
                format!("❌ {reason}")
            }
            CommandError::Permission => {
                "⛔ This command is only available to the administrator.".to_string()
            }
            CommandError::Usage(usage) => format!("ℹ️ Usage: `{prefix}{usage}`"),
            CommandError::Storage(_) => {
                "Sorry, I encountered an error processing your command.".to_string()
            }
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, CommandError::Storage(_))
    }
}
