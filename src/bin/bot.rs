use anyhow::Result;
use chrono::Utc;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;

use remindbot::commands::{CommandContext, CommandHandler};
use remindbot::core::Config;
use remindbot::database::Database;
use remindbot::features::reminders::{DiscordSender, ReminderScheduler};

struct Handler {
    command_handler: Arc<CommandHandler>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if let Err(e) = self.command_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {e}");
            if let Err(why) = msg
                .channel_id
                .say(
                    &ctx.http,
                    "Sorry, I encountered an error processing your message.",
                )
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting reminder bot...");
    info!("🕒 Reminder timezone: {}", config.timezone);
    if config.admin_chat_id().is_none() {
        warn!("⚠️ ADMIN_CHAT_ID is not set, admin commands are disabled");
    }

    let database = Database::new(&config.database_path).await?;

    // Reminders are delivered over REST, so the scheduler doesn't need the gateway
    let http = Arc::new(Http::new(&config.discord_token));
    let sender = Arc::new(DiscordSender::new(http));
    let scheduler = ReminderScheduler::new(database.clone(), sender, config.timezone);

    let report = scheduler.recover(Utc::now(), config.deliver_missed).await?;
    info!(
        "⏰ Restored reminders: {} armed, {} overdue, {} delivered late",
        report.armed, report.overdue, report.overdue_fired
    );

    let config = Arc::new(config);
    let context = CommandContext::new(database, scheduler, config.clone());
    let handler = Handler {
        command_handler: Arc::new(CommandHandler::new(context)),
    };

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            error!("This could indicate:");
            error!("  - Invalid bot token format");
            error!("  - Network issues reaching Discord API");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Establishing WebSocket connection to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
