//! Text command handler trait and invocation type
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Text commands with positional arguments; handlers return the reply
//! - 1.0.0: Initial implementation for modular command handling

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::context::CommandContext;
use super::error::CommandResult;

/// A parsed chat command, independent of the chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub request_id: Uuid,
    /// Chat the command came from; replies and "self" reminders go here
    pub chat_id: i64,
    /// Sender's display name as reported by the transport
    pub display_name: String,
    /// Lowercased command word without the prefix
    pub command: String,
    /// Whitespace-separated arguments after the command word
    pub args: Vec<String>,
}

impl CommandInvocation {
    /// Parse `content` as a command, or `None` if it doesn't start with `prefix`
    pub fn parse(prefix: &str, chat_id: i64, display_name: &str, content: &str) -> Option<Self> {
        let body = content.trim().strip_prefix(prefix)?;
        let mut parts = body.split_whitespace();
        let command = parts.next()?.to_lowercase();

        Some(CommandInvocation {
            request_id: Uuid::new_v4(),
            chat_id,
            display_name: display_name.to_string(),
            command,
            args: parts.map(str::to_string).collect(),
        })
    }
}

/// Trait for text command handlers
///
/// Each handler processes one or more command words and returns the reply
/// text. Rejections are returned as [`CommandError`](super::error::CommandError)
/// and turned into replies by the dispatcher.
///
/// # Example
///
/// ```ignore
/// pub struct PingHandler;
///
/// #[async_trait]
/// impl TextCommandHandler for PingHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["ping"]
///     }
///
///     async fn handle(&self, _ctx: Arc<CommandContext>, _inv: &CommandInvocation) -> CommandResult {
///         Ok("pong".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait TextCommandHandler: Send + Sync {
    /// Command word(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        invocation: &CommandInvocation,
    ) -> CommandResult;
}
