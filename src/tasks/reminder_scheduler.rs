use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use crate::handlers::sender::MessageSender;

pub type ReminderId = String;

pub trait ReminderScheduler: Send + Sync {
    /// Registers a one-shot delivery of `content` to `channel_id` at `trigger_at`.
    /// A trigger that is already past fires immediately.
    fn schedule(&self, trigger_at: DateTime<Utc>, channel_id: &str, content: String) -> ReminderId;

    /// Returns false when the reminder already fired or was never scheduled.
    fn cancel(&self, id: &str) -> bool;
}

/// Runs each reminder as its own tokio task sleeping until the trigger time.
pub struct TokioReminderScheduler {
    sender: Arc<dyn MessageSender>,
    handles: Arc<Mutex<HashMap<ReminderId, JoinHandle<()>>>>,
}

impl TokioReminderScheduler {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self {
            sender,
            handles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn pending(&self) -> usize {
        self.handles.lock().map(|handles| handles.len()).unwrap_or(0)
    }
}

impl ReminderScheduler for TokioReminderScheduler {
    fn schedule(&self, trigger_at: DateTime<Utc>, channel_id: &str, content: String) -> ReminderId {
        let id = Uuid::new_v4().to_string();
        let sender = self.sender.clone();
        let handles = self.handles.clone();
        let channel_id = channel_id.to_string();
        let task_id = id.clone();

        // Hold the lock across spawn so a reminder that fires at once cannot remove
        // its handle before it has been inserted.
        let Ok(mut guard) = self.handles.lock() else {
            warn!("reminder handle table poisoned, reminder not scheduled");
            return id;
        };
        let handle = tokio::spawn(async move {
            let sleep_for = (trigger_at - Utc::now())
                .to_std()
                .unwrap_or(std::time::Duration::ZERO);
            sleep(sleep_for).await;
            if let Ok(mut handles) = handles.lock() {
                handles.remove(&task_id);
            }
            match sender.send_message(&channel_id, &content).await {
                Ok(()) => info!(reminder = %task_id, channel = %channel_id, "reminder sent"),
                Err(err) => warn!(reminder = %task_id, error = %err, "failed to send reminder"),
            }
        });
        guard.insert(id.clone(), handle);
        id
    }

    fn cancel(&self, id: &str) -> bool {
        let removed = match self.handles.lock() {
            Ok(mut handles) => handles.remove(id),
            Err(_) => None,
        };
        match removed {
            Some(handle) => {
                handle.abort();
                info!(reminder = %id, "reminder cancelled");
                true
            }
            None => false,
        }
    }
}
