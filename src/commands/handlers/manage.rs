//! Reminder listing and cancellation handlers
//!
//! Handles: list-mine, cancel-mine, list-all, cancel-any
//!
//! - **Version**: 1.0.0
//! - **Since**: 4.0.0

use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::error::{CommandError, CommandResult};
use crate::commands::handler::{CommandInvocation, TextCommandHandler};
use crate::commands::parse::parse_reminder_id;
use crate::features::reminders::Reminder;

/// Handler for listing and cancelling reminders
pub struct ManageHandler;

#[async_trait]
impl TextCommandHandler for ManageHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["list-mine", "cancel-mine", "list-all", "cancel-any"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &CommandInvocation) -> CommandResult {
        match invocation.command.as_str() {
            "list-mine" => self.handle_list_mine(&ctx, invocation).await,
            "cancel-mine" => self.handle_cancel(&ctx, invocation, false).await,
            "list-all" => self.handle_list_all(&ctx, invocation).await,
            "cancel-any" => self.handle_cancel(&ctx, invocation, true).await,
            _ => Err(CommandError::Usage("list-mine")),
        }
    }
}

impl ManageHandler {
    async fn handle_list_mine(&self, ctx: &CommandContext, invocation: &CommandInvocation) -> CommandResult {
        let reminders = ctx
            .database
            .list_reminders_by_creator(invocation.chat_id)
            .await?;

        if reminders.is_empty() {
            return Ok(format!(
                "📋 You don't have any pending reminders.\n\nUse `{} <YYYY-MM-DD> <HH:MM> <text>` to create one!",
                ctx.cmd("remind-self")
            ));
        }

        let mut list = String::from("📋 **Your pending reminders:**\n");
        for reminder in &reminders {
            list.push_str(&format_entry(ctx, reminder));
            if reminder.target_chat_id != invocation.chat_id {
                list.push_str(&format!(" → {}", reminder.target_chat_id));
            }
            list.push_str(&format!("\n> {}\n", reminder.message));
        }
        list.push_str(&format!(
            "\n*Use `{} <id>` to cancel a reminder.*",
            ctx.cmd("cancel-mine")
        ));
        Ok(list)
    }

    async fn handle_list_all(&self, ctx: &CommandContext, invocation: &CommandInvocation) -> CommandResult {
        ctx.require_admin(invocation.chat_id)?;

        let reminders = ctx.database.list_all_reminders().await?;
        if reminders.is_empty() {
            return Ok("📋 There are no pending reminders.".to_string());
        }

        let mut list = format!("📋 **All pending reminders ({}):**\n", reminders.len());
        for reminder in &reminders {
            list.push_str(&format_entry(ctx, reminder));
            list.push_str(&format!(
                " | from {} to {}\n> {}\n",
                reminder.creator_chat_id, reminder.target_chat_id, reminder.message
            ));
        }
        Ok(list)
    }

    /// Delete a reminder; `any` skips the ownership check (admin only)
    async fn handle_cancel(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
        any: bool,
    ) -> CommandResult {
        if any {
            ctx.require_admin(invocation.chat_id)?;
        }
        let raw_id = invocation.args.first().ok_or(CommandError::Usage(if any {
            "cancel-any <id>"
        } else {
            "cancel-mine <id>"
        }))?;
        let id = parse_reminder_id(raw_id)?;

        let reminder = ctx.database.get_reminder(id).await?;
        let owned = match &reminder {
            Some(r) => any || r.creator_chat_id == invocation.chat_id,
            None => false,
        };
        if !owned {
            return Err(CommandError::NotFound(if any {
                format!("Reminder #{id} not found.")
            } else {
                format!("Reminder #{id} not found or doesn't belong to you.")
            }));
        }

        ctx.database.delete_reminder(id).await?;
        ctx.scheduler.disarm(id);
        info!(
            "[{}] Cancelled reminder #{id} (requested by {})",
            invocation.request_id, invocation.chat_id
        );
        Ok(format!("✅ Cancelled reminder #{id}."))
    }
}

fn format_entry(ctx: &CommandContext, reminder: &Reminder) -> String {
    let mut entry = format!(
        "**#{}** - {}",
        reminder.id,
        reminder.local_time(&ctx.config.timezone)
    );
    if let Some(minutes) = reminder.repeat_interval {
        entry.push_str(&format!(" (every {minutes} min)"));
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::{test_context, ADMIN};
    use crate::features::reminders::NewReminder;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn invocation(chat_id: i64, command: &str, args: &[&str]) -> CommandInvocation {
        CommandInvocation {
            request_id: Uuid::new_v4(),
            chat_id,
            display_name: "tester".to_string(),
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    async fn seed(ctx: &CommandContext, creator: i64, hours: i64, message: &str) -> Reminder {
        let new = NewReminder {
            creator_chat_id: creator,
            target_chat_id: creator,
            fire_at: Utc::now() + Duration::hours(hours),
            message: message.to_string(),
            repeat_interval: None,
        };
        let id = ctx.database.create_reminder(&new).await.unwrap();
        let reminder = ctx.database.get_reminder(id).await.unwrap().unwrap();
        ctx.scheduler.arm(reminder.clone());
        reminder
    }

    #[tokio::test]
    async fn test_list_mine_shows_only_own_in_order() {
        let (ctx, _) = test_context();
        seed(&ctx, 5, 3, "later").await;
        seed(&ctx, 5, 1, "sooner").await;
        seed(&ctx, 6, 2, "someone else").await;

        let reply = ManageHandler
            .handle(ctx.clone(), &invocation(5, "list-mine", &[]))
            .await
            .unwrap();

        assert!(reply.contains("sooner"));
        assert!(reply.contains("later"));
        assert!(!reply.contains("someone else"));
        assert!(reply.find("sooner").unwrap() < reply.find("later").unwrap());
    }

    #[tokio::test]
    async fn test_list_mine_empty() {
        let (ctx, _) = test_context();
        let reply = ManageHandler
            .handle(ctx.clone(), &invocation(5, "list-mine", &[]))
            .await
            .unwrap();
        assert!(reply.contains("don't have any pending reminders"));
    }

    #[tokio::test]
    async fn test_cancel_mine_deletes_and_disarms() {
        let (ctx, _) = test_context();
        let reminder = seed(&ctx, 5, 1, "mine").await;
        let id = reminder.id.to_string();

        let reply = ManageHandler
            .handle(ctx.clone(), &invocation(5, "cancel-mine", &[&id]))
            .await
            .unwrap();

        assert!(reply.contains("Cancelled"));
        assert!(ctx.database.get_reminder(reminder.id).await.unwrap().is_none());
        assert!(!ctx.scheduler.is_armed(reminder.id));
    }

    #[tokio::test]
    async fn test_cancel_mine_rejects_foreign_reminder() {
        let (ctx, _) = test_context();
        let reminder = seed(&ctx, 6, 1, "not yours").await;
        let id = reminder.id.to_string();

        let err = ManageHandler
            .handle(ctx.clone(), &invocation(5, "cancel-mine", &[&id]))
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::NotFound(_)));
        assert!(ctx.database.get_reminder(reminder.id).await.unwrap().is_some());
        assert!(ctx.scheduler.is_armed(reminder.id));
    }

    #[tokio::test]
    async fn test_cancel_any_is_admin_only() {
        let (ctx, _) = test_context();
        let reminder = seed(&ctx, 6, 1, "target").await;
        let id = reminder.id.to_string();

        let err = ManageHandler
            .handle(ctx.clone(), &invocation(5, "cancel-any", &[&id]))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Permission));
        assert!(ctx.database.get_reminder(reminder.id).await.unwrap().is_some());

        ManageHandler
            .handle(ctx.clone(), &invocation(ADMIN, "cancel-any", &[&id]))
            .await
            .unwrap();
        assert!(ctx.database.get_reminder(reminder.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_includes_owner_and_target() {
        let (ctx, _) = test_context();
        seed(&ctx, 5, 1, "first").await;
        seed(&ctx, 6, 2, "second").await;

        assert!(matches!(
            ManageHandler
                .handle(ctx.clone(), &invocation(5, "list-all", &[]))
                .await,
            Err(CommandError::Permission)
        ));

        let reply = ManageHandler
            .handle(ctx.clone(), &invocation(ADMIN, "list-all", &[]))
            .await
            .unwrap();
        assert!(reply.contains("(2)"));
        assert!(reply.contains("from 5 to 5"));
        assert!(reply.contains("from 6 to 6"));
    }

    #[tokio::test]
    async fn test_cancel_unknown_and_malformed_ids() {
        let (ctx, _) = test_context();
        assert!(matches!(
            ManageHandler
                .handle(ctx.clone(), &invocation(5, "cancel-mine", &["999"]))
                .await,
            Err(CommandError::NotFound(_))
        ));
        assert!(matches!(
            ManageHandler
                .handle(ctx.clone(), &invocation(5, "cancel-mine", &["abc"]))
                .await,
            Err(CommandError::Validation(_))
        ));
        assert!(matches!(
            ManageHandler
                .handle(ctx.clone(), &invocation(5, "cancel-mine", &[]))
                .await,
            Err(CommandError::Usage(_))
        ));
    }
}
