//! Outbound message delivery
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::UserId;
use std::sync::Arc;

/// Sends a text message to a chat.
///
/// The scheduler only talks to the chat transport through this trait.
#[async_trait]
pub trait ReminderSender: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Delivers reminders as Discord direct messages
pub struct DiscordSender {
    http: Arc<Http>,
}

impl DiscordSender {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ReminderSender for DiscordSender {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        let user = UserId(chat_id as u64);
        let channel = user.create_dm_channel(&*self.http).await?;
        channel.id.say(&self.http, text).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// Records every message instead of sending it
    #[derive(Default)]
    pub struct RecordingSender {
        sent: Mutex<Vec<(i64, String)>>,
    }

    impl RecordingSender {
        pub async fn sent(&self) -> Vec<(i64, String)> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl ReminderSender for RecordingSender {
        async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
            self.sent.lock().await.push((chat_id, text.to_string()));
            Ok(())
        }
    }

    /// Fails every delivery
    pub struct FailingSender;

    #[async_trait]
    impl ReminderSender for FailingSender {
        async fn send(&self, _chat_id: i64, _text: &str) -> Result<()> {
            Err(anyhow::anyhow!("chat unreachable"))
        }
    }
}
