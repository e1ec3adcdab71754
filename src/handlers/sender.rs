use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("failed to parse channel id {0}")]
    InvalidChannel(String),
    #[error("error sending message: {0}")]
    Transport(String),
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), SendError>;
}

pub struct DiscordSender {
    http: Http,
}

impl DiscordSender {
    pub fn new(token: &str) -> Self {
        Self {
            http: Http::new(token),
        }
    }
}

#[async_trait]
impl MessageSender for DiscordSender {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), SendError> {
        let channel = channel_id
            .parse::<u64>()
            .map(ChannelId::new)
            .map_err(|_| SendError::InvalidChannel(channel_id.to_string()))?;
        channel
            .say(&self.http, content)
            .await
            .map_err(|e| SendError::Transport(format!("{:?}", e)))?;
        Ok(())
    }
}

/// Prints replies to stdout, used by the interactive and script run modes.
pub struct ConsoleSender;

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), SendError> {
        println!("[#{}] {}", channel_id, content);
        Ok(())
    }
}
