//! Reminder creation handlers
//!
//! Handles: remind-self, repeat-self, remind-other, repeat-other
//!
//! - **Version**: 2.1.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.1.0: Multi-word contact names for remind-other/repeat-other
//! - 2.0.0: Absolute local date/time, recurring reminders, admin reminders for contacts
//! - 1.0.0: Extracted from command_handler.rs

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::info;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::error::{CommandError, CommandResult};
use crate::commands::handler::{CommandInvocation, TextCommandHandler};
use crate::commands::parse::{
    check_repeat, parse_fire_at, parse_interval, parse_message, DATE_FORMAT,
};
use crate::database::Contact;
use crate::features::reminders::NewReminder;

const REMIND_SELF_USAGE: &str = "remind-self <YYYY-MM-DD> <HH:MM> <text>";
const REPEAT_SELF_USAGE: &str = "repeat-self <YYYY-MM-DD> <HH:MM> <minutes> <text>";
const REMIND_OTHER_USAGE: &str = "remind-other <name> <YYYY-MM-DD> <HH:MM> <text>";
const REPEAT_OTHER_USAGE: &str = "repeat-other <name> <YYYY-MM-DD> <HH:MM> <minutes> <text>";

/// Handler for reminder creation commands
pub struct RemindHandler;

#[async_trait]
impl TextCommandHandler for RemindHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["remind-self", "repeat-self", "remind-other", "repeat-other"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &CommandInvocation) -> CommandResult {
        match invocation.command.as_str() {
            "remind-self" => self.handle_self(&ctx, invocation, false).await,
            "repeat-self" => self.handle_self(&ctx, invocation, true).await,
            "remind-other" => self.handle_other(&ctx, invocation, false).await,
            "repeat-other" => self.handle_other(&ctx, invocation, true).await,
            _ => Err(CommandError::Usage(REMIND_SELF_USAGE)),
        }
    }
}

/// Where a reminder goes
enum Target {
    Myself,
    Contact(Contact),
}

impl RemindHandler {
    async fn handle_self(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
        recurring: bool,
    ) -> CommandResult {
        let (min_args, usage) = if recurring {
            (4, REPEAT_SELF_USAGE)
        } else {
            (3, REMIND_SELF_USAGE)
        };
        if invocation.args.len() < min_args {
            return Err(CommandError::Usage(usage));
        }

        self.create(ctx, invocation, Target::Myself, &invocation.args, recurring)
            .await
    }

    async fn handle_other(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
        recurring: bool,
    ) -> CommandResult {
        ctx.require_admin(invocation.chat_id)?;

        let (min_args, usage) = if recurring {
            (5, REPEAT_OTHER_USAGE)
        } else {
            (4, REMIND_OTHER_USAGE)
        };
        if invocation.args.len() < min_args {
            return Err(CommandError::Usage(usage));
        }

        // The name runs up to the first argument that reads as a date
        let args = &invocation.args;
        let date_at = args
            .iter()
            .position(|arg| NaiveDate::parse_from_str(arg, DATE_FORMAT).is_ok())
            .filter(|pos| *pos > 0 && args.len() - pos >= min_args - 1)
            .ok_or(CommandError::Usage(usage))?;

        let name = args[..date_at].join(" ");
        let contact = ctx.database.find_contact_by_name(&name).await?.ok_or_else(|| {
            CommandError::NotFound(format!(
                "Contact `{name}` not found. Check {} or ask them to {} first.",
                ctx.cmd("list-contacts"),
                ctx.cmd("register")
            ))
        })?;

        self.create(
            ctx,
            invocation,
            Target::Contact(contact),
            &args[date_at..],
            recurring,
        )
        .await
    }

    /// `args` starts at the date: `<date> <time> [<minutes>] <text...>`
    async fn create(
        &self,
        ctx: &CommandContext,
        invocation: &CommandInvocation,
        target: Target,
        args: &[String],
        recurring: bool,
    ) -> CommandResult {
        let timezone = &ctx.config.timezone;
        let fire_at = parse_fire_at(&args[0], &args[1], timezone, Utc::now())?;
        let (repeat_interval, text_args) = if recurring {
            let minutes = parse_interval(&args[2])?;
            check_repeat(fire_at, minutes)?;
            (Some(minutes), &args[3..])
        } else {
            (None, &args[2..])
        };
        let message = parse_message(text_args)?;

        let target_chat_id = match &target {
            Target::Myself => invocation.chat_id,
            Target::Contact(contact) => contact.chat_id,
        };
        let new = NewReminder {
            creator_chat_id: invocation.chat_id,
            target_chat_id,
            fire_at,
            message,
            repeat_interval,
        };

        let id = ctx.database.create_reminder(&new).await?;
        let reminder = new.into_reminder(id);
        let local_time = reminder.local_time(timezone);

        info!(
            "[{}] Created reminder #{id} from {} to {} at {local_time} (repeat: {:?})",
            invocation.request_id, invocation.chat_id, target_chat_id, repeat_interval
        );

        let mut reply = match &target {
            Target::Myself => format!("⏰ Got it! Reminder **#{id}** set for **{local_time}**"),
            Target::Contact(contact) => format!(
                "⏰ Got it! Reminder **#{id}** for **{}** set for **{local_time}**",
                contact.name
            ),
        };
        reply.push_str(&format!(":\n> {}", reminder.message));
        if let Some(minutes) = repeat_interval {
            reply.push_str(&format!("\n🔁 Repeats every {minutes} minutes."));
        }

        ctx.scheduler.arm(reminder);
        Ok(reply)
    }
}
