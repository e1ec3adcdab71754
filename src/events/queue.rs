use tokio::sync::mpsc;
use tracing::warn;

use crate::models::chat_message::ChatMessage;

#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::Sender<ChatMessage>,
}

impl EventBus {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<ChatMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn emit(&self, message: ChatMessage) {
        if self.tx.send(message).await.is_err() {
            warn!("event worker is gone, dropping inbound message");
        }
    }
}
