//! Help command handler
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0

use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::error::CommandResult;
use crate::commands::handler::{CommandInvocation, TextCommandHandler};

const USER_COMMANDS: &[(&str, &str)] = &[
    ("register", "register yourself as a contact"),
    ("set-name <name>", "set the name others address you by"),
    ("remind-self <YYYY-MM-DD> <HH:MM> <text>", "one-time reminder"),
    ("repeat-self <YYYY-MM-DD> <HH:MM> <minutes> <text>", "repeating reminder"),
    ("list-mine", "your pending reminders"),
    ("cancel-mine <id>", "cancel one of your reminders"),
    ("help", "this message"),
];

const ADMIN_COMMANDS: &[(&str, &str)] = &[
    ("set-name <chat_id> <name>", "name another chat"),
    ("list-contacts", "all registered contacts"),
    ("remind-other <name> <YYYY-MM-DD> <HH:MM> <text>", "one-time reminder for a contact"),
    ("repeat-other <name> <YYYY-MM-DD> <HH:MM> <minutes> <text>", "repeating reminder for a contact"),
    ("list-all", "every pending reminder"),
    ("cancel-any <id>", "cancel any reminder"),
];

pub struct HelpHandler;

#[async_trait]
impl TextCommandHandler for HelpHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["help"]
    }

    async fn handle(&self, ctx: Arc<CommandContext>, invocation: &CommandInvocation) -> CommandResult {
        let mut help = String::from("**Available commands:**\n");
        push_commands(&mut help, &ctx, USER_COMMANDS);

        if ctx.config.is_admin(invocation.chat_id) {
            help.push_str("\n**Admin commands:**\n");
            push_commands(&mut help, &ctx, ADMIN_COMMANDS);
        }

        help.push_str(&format!(
            "\nTimes are in **{}**.",
            ctx.config.timezone
        ));
        Ok(help)
    }
}

fn push_commands(help: &mut String, ctx: &CommandContext, commands: &[(&str, &str)]) {
    for (usage, description) in commands {
        help.push_str(&format!("`{}` - {description}\n", ctx.cmd(usage)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::testing::{test_context, ADMIN};
    use uuid::Uuid;

    fn help_for(chat_id: i64) -> CommandInvocation {
        CommandInvocation {
            request_id: Uuid::new_v4(),
            chat_id,
            display_name: String::new(),
            command: "help".to_string(),
            args: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_admin_section_only_for_admin() {
        let (ctx, _) = test_context();

        let user = HelpHandler.handle(ctx.clone(), &help_for(5)).await.unwrap();
        assert!(user.contains("/remind-self"));
        assert!(!user.contains("/cancel-any"));

        let admin = HelpHandler.handle(ctx.clone(), &help_for(ADMIN)).await.unwrap();
        assert!(admin.contains("/cancel-any"));
        assert!(admin.contains("UTC"));
    }
}
