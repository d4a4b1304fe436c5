//! # Command Dispatcher
//!
//! Turns incoming chat messages into command invocations, applies the
//! per-chat rate limit and routes to the registered handlers.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Registry-based dispatch for the reminder command set
//! - 1.0.0: Monolithic message and command handling

use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::CommandInvocation;
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;
use crate::core::split_for_message;
use crate::features::rate_limiting::RateLimiter;

const RATE_LIMITED_REPLY: &str = "You're sending commands too quickly! Please slow down.";

#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: Arc<CommandRegistry>,
    rate_limiter: RateLimiter,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        info!("📋 Registered {} command words", registry.len());

        let rate_limiter = RateLimiter::new(
            context.config.rate_limit_max,
            context.config.rate_limit_window,
        );

        CommandHandler {
            context: Arc::new(context),
            registry: Arc::new(registry),
            rate_limiter,
        }
    }

    pub fn context(&self) -> &Arc<CommandContext> {
        &self.context
    }

    /// Handle a Discord message; anything that isn't a prefixed command is ignored
    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if msg.author.bot {
            return Ok(());
        }

        let chat_id = msg.author.id.0 as i64;
        let Some(invocation) = CommandInvocation::parse(
            &self.context.config.command_prefix,
            chat_id,
            &msg.author.name,
            &msg.content,
        ) else {
            return Ok(());
        };

        info!(
            "[{}] 📥 Command received | Chat: {} | Command: {} | Args: {}",
            invocation.request_id,
            chat_id,
            invocation.command,
            invocation.args.len()
        );

        let reply = self.dispatch(&invocation).await;
        for chunk in split_for_message(&reply) {
            msg.channel_id.say(&ctx.http, chunk).await?;
        }
        debug!("[{}] 📤 Reply sent", invocation.request_id);
        Ok(())
    }

    /// Run one invocation and produce the reply text
    pub async fn dispatch(&self, invocation: &CommandInvocation) -> String {
        let request_id = invocation.request_id;
        let prefix = &self.context.config.command_prefix;

        if !self.rate_limiter.check(invocation.chat_id) {
            warn!(
                "[{request_id}] 🚫 Rate limit exceeded for chat: {}",
                invocation.chat_id
            );
            return RATE_LIMITED_REPLY.to_string();
        }

        let Some(handler) = self.registry.get(&invocation.command) else {
            debug!("[{request_id}] ❓ Unknown command: {}", invocation.command);
            return format!(
                "Unknown command. Use `{prefix}help` to see available commands."
            );
        };

        match handler.handle(self.context.clone(), invocation).await {
            Ok(reply) => {
                debug!("[{request_id}] ✅ Command {} completed", invocation.command);
                reply
            }
            Err(e) if e.is_internal() => {
                error!("[{request_id}] ❌ Command {} failed: {e:#}", invocation.command);
                e.user_message(prefix)
            }
            Err(e) => {
                warn!("[{request_id}] ⚠️ Command {} rejected: {e}", invocation.command);
                e.user_message(prefix)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::{test_context, ADMIN};
    use chrono::{Duration, Utc};

    fn handler() -> (CommandHandler, Arc<crate::features::reminders::delivery::testing::RecordingSender>) {
        let (ctx, sender) = test_context();
        (CommandHandler::new((*ctx).clone()), sender)
    }

    fn command(chat_id: i64, content: &str) -> CommandInvocation {
        CommandInvocation::parse("/", chat_id, "Tester", content).unwrap()
    }

    fn future_date() -> String {
        (Utc::now() + Duration::days(10)).format("%Y-%m-%d").to_string()
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (handler, _) = handler();
        let reply = handler.dispatch(&command(5, "/frobnicate")).await;
        assert!(reply.starts_with("Unknown command"));
        assert!(reply.contains("/help"));
    }

    #[tokio::test]
    async fn test_rate_limit_applies_per_chat() {
        let (handler, _) = handler();
        let limit = handler.context().config.rate_limit_max;
        for _ in 0..limit {
            assert_ne!(handler.dispatch(&command(5, "/help")).await, RATE_LIMITED_REPLY);
        }
        assert_eq!(handler.dispatch(&command(5, "/help")).await, RATE_LIMITED_REPLY);
        assert_ne!(handler.dispatch(&command(6, "/help")).await, RATE_LIMITED_REPLY);
    }

    #[tokio::test]
    async fn test_rejections_become_replies() {
        let (handler, _) = handler();

        let usage = handler.dispatch(&command(5, "/remind-self tomorrow")).await;
        assert!(usage.starts_with("ℹ️ Usage: `/remind-self"));

        let denied = handler.dispatch(&command(5, "/list-all")).await;
        assert!(denied.starts_with("⛔"));

        let invalid = handler
            .dispatch(&command(5, "/remind-self 2024-13-45 09:00 nope"))
            .await;
        assert!(invalid.starts_with("❌"));
    }

    #[tokio::test]
    async fn test_register_remind_list_cancel_flow() {
        let (handler, _) = handler();
        let date = future_date();

        handler.dispatch(&command(5, "/start")).await;
        let created = handler
            .dispatch(&command(5, &format!("/REMIND-SELF {date} 18:30 Buy milk")))
            .await;
        assert!(created.contains("Got it"));

        let reminders = handler.context().database.list_all_reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        let id = reminders[0].id;

        let listed = handler.dispatch(&command(5, "/list-mine")).await;
        assert!(listed.contains("Buy milk"));
        assert!(listed.contains(&format!("#{id}")));

        let cancelled = handler
            .dispatch(&command(5, &format!("/cancel-mine {id}")))
            .await;
        assert!(cancelled.contains("Cancelled"));
        assert!(!handler.context().scheduler.is_armed(id));
        assert!(handler
            .dispatch(&command(5, "/list-mine"))
            .await
            .contains("don't have any"));
    }

    #[tokio::test]
    async fn test_admin_reminds_registered_contact() {
        let (handler, sender) = handler();
        let date = future_date();

        handler.dispatch(&command(7, "/register")).await;
        handler.dispatch(&command(7, "/set-name Maria")).await;

        let reply = handler
            .dispatch(&command(ADMIN, &format!("/remind-other maria {date} 08:00 Pills")))
            .await;
        assert!(reply.contains("for **Maria**"));

        let reminders = handler.context().database.list_all_reminders().await.unwrap();
        assert_eq!(reminders[0].target_chat_id, 7);

        // firing delivers to the contact, and the creator hears about it
        handler.context().scheduler.fire(reminders[0].id).await.unwrap();
        let sent = sender.sent().await;
        assert!(sent.iter().any(|(chat, text)| *chat == 7 && text.contains("Pills")));
        assert!(sent.iter().any(|(chat, _)| *chat == ADMIN));
    }

    #[tokio::test]
    async fn test_help_admin_visibility() {
        let (handler, _) = handler();
        assert!(!handler.dispatch(&command(5, "/help")).await.contains("list-all"));
        assert!(handler.dispatch(&command(ADMIN, "/help")).await.contains("list-all"));
    }
}
