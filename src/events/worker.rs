use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::info;

use crate::models::chat_message::ChatMessage;
use crate::service::dispatcher::Dispatcher;

/// Drains the bus one message at a time, so store mutations happen in arrival order.
pub async fn run_event_worker(mut rx: mpsc::Receiver<ChatMessage>, dispatcher: Arc<Dispatcher>) {
    while let Some(message) = rx.recv().await {
        dispatcher.dispatch(&message, Utc::now()).await;
    }
    info!("event bus closed, worker stopping");
}
