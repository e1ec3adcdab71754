use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::info;

use crate::events::queue::EventBus;
use crate::models::chat_message::ChatMessage;

pub struct BotHandler {
    event_bus: EventBus,
}

impl BotHandler {
    pub fn new(event_bus: EventBus) -> Self {
        BotHandler { event_bus }
    }

    /// Queues a decoded message for the worker. Blank text is dropped here.
    pub async fn handle_message_internal(
        &self,
        text: &str,
        user_id: &str,
        user_name: &str,
        channel_id: &str,
    ) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.event_bus
            .emit(ChatMessage::new(user_id, user_name, channel_id, text))
            .await;
        true
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "connected to Discord");
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        self.handle_message_internal(
            &msg.content,
            &msg.author.id.to_string(),
            &msg.author.name,
            &msg.channel_id.to_string(),
        )
        .await;
    }
}
