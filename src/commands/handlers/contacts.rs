//! Contact directory handlers
//!
//! Handles: register (alias start), set-name, list-contacts
//!
//! - **Version**: 1.1.0
//! - **Since**: 4.0.0
//!
//! ## Changelog
//! - 1.1.0: set-name for another chat id and list-contacts are admin only
//! - 1.0.0: Initial registration and naming

use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::error::{CommandError, CommandResult};
use crate::commands::handler::{CommandInvocation, TextCommandHandler};

const SET_NAME_USAGE: &str = "set-name <name> (admin: set-name <chat_id> <name>)";

pub struct ContactsHandler;

#[async_trait]
impl TextCommandHandler for ContactsHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["register", "start", "set-name", "list-contacts"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &CommandInvocation) -> CommandResult {
        match invocation.command.as_str() {
            "register" | "start" => self.handle_register(&ctx, invocation).await,
            "set-name" => self.handle_set_name(&ctx, invocation).await,
            "list-contacts" => self.handle_list(&ctx, invocation).await,
            _ => Err(CommandError::Usage(SET_NAME_USAGE)),
        }
    }
}

impl ContactsHandler {
    async fn handle_register(&self, ctx: &CommandContext, invocation: &CommandInvocation) -> CommandResult {
        let display_name = invocation.display_name.trim();
        let name = if display_name.is_empty() {
            invocation.chat_id.to_string()
        } else {
            display_name.to_string()
        };

        ctx.database.upsert_contact(invocation.chat_id, &name).await?;
        info!(
            "[{}] Registered contact {} as '{name}'",
            invocation.request_id, invocation.chat_id
        );

        Ok(format!(
            "👋 Hi! You're registered as **{name}**.\n\
             Use `{}` to change the name others can address you by.\n\
             Times are entered and shown in **{}**. Send `{}` for all commands.",
            ctx.cmd("set-name <name>"),
            ctx.config.timezone,
            ctx.cmd("help")
        ))
    }

    async fn handle_set_name(&self, ctx: &CommandContext, invocation: &CommandInvocation) -> CommandResult {
        let args = &invocation.args;
        if args.is_empty() {
            return Err(CommandError::Usage(SET_NAME_USAGE));
        }

        // `<chat_id> <name>` renames someone else
        let (chat_id, name_args) = match args[0].parse::<i64>() {
            Ok(other) if args.len() > 1 => {
                ctx.require_admin(invocation.chat_id)?;
                (other, &args[1..])
            }
            _ => (invocation.chat_id, &args[..]),
        };

        let name = name_args.join(" ").trim().to_string();
        if name.is_empty() {
            return Err(CommandError::Validation("The name can't be empty.".to_string()));
        }

        ctx.database.upsert_contact(chat_id, &name).await?;
        info!(
            "[{}] Contact {chat_id} named '{name}' by {}",
            invocation.request_id, invocation.chat_id
        );

        if chat_id == invocation.chat_id {
            Ok(format!("✅ Saved your name: **{name}**"))
        } else {
            Ok(format!("✅ Saved name for {chat_id}: **{name}**"))
        }
    }

    async fn handle_list(&self, ctx: &CommandContext, invocation: &CommandInvocation) -> CommandResult {
        ctx.require_admin(invocation.chat_id)?;

        let contacts = ctx.database.list_contacts().await?;
        if contacts.is_empty() {
            return Ok(format!(
                "📇 No contacts yet. People can join with `{}`.",
                ctx.cmd("register")
            ));
        }

        let mut list = String::from("📇 **Contacts:**\n");
        for contact in &contacts {
            list.push_str(&format!("• {} (id: {})\n", contact.name, contact.chat_id));
        }
        Ok(list)
    }
}
