use std::sync::Arc;

use chrono::{Duration, Utc};
use fixtureBot::handlers::sender::{MessageSender, SendError};
use fixtureBot::tasks::reminder_scheduler::{ReminderScheduler, TokioReminderScheduler};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};

#[derive(Default)]
struct MockSender {
    sent: Mutex<Vec<(String, String)>>,
}

#[serenity::async_trait]
impl MessageSender for MockSender {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), SendError> {
        let mut sent = self.sent.lock().await;
        sent.push((channel_id.to_string(), content.to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn overdue_reminder_fires_immediately() {
    let sender = Arc::new(MockSender::default());
    let scheduler = TokioReminderScheduler::new(sender.clone());

    scheduler.schedule(Utc::now() - Duration::minutes(5), "pitch", "time to go".to_string());

    timeout(std::time::Duration::from_secs(2), async {
        loop {
            if !sender.sent.lock().await.is_empty() {
                break;
            }
            sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("overdue reminder should fire right away");

    let sent = sender.sent.lock().await;
    assert_eq!(sent.as_slice(), &[("pitch".to_string(), "time to go".to_string())]);
    assert_eq!(scheduler.pending(), 0);
}

#[tokio::test]
async fn future_reminder_waits_and_can_be_cancelled() {
    let sender = Arc::new(MockSender::default());
    let scheduler = TokioReminderScheduler::new(sender.clone());

    let id = scheduler.schedule(Utc::now() + Duration::hours(1), "pitch", "later".to_string());
    sleep(std::time::Duration::from_millis(50)).await;

    assert!(sender.sent.lock().await.is_empty());
    assert_eq!(scheduler.pending(), 1);
    assert!(scheduler.cancel(&id));
    assert!(!scheduler.cancel(&id));
    assert_eq!(scheduler.pending(), 0);
}

#[tokio::test]
async fn reminders_fire_independently() {
    let sender = Arc::new(MockSender::default());
    let scheduler = TokioReminderScheduler::new(sender.clone());

    scheduler.schedule(Utc::now() + Duration::milliseconds(80), "a", "second".to_string());
    scheduler.schedule(Utc::now(), "b", "first".to_string());

    timeout(std::time::Duration::from_secs(2), async {
        loop {
            if sender.sent.lock().await.len() == 2 {
                break;
            }
            sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("both reminders should fire");

    let sent = sender.sent.lock().await;
    assert_eq!(sent[0].1, "first");
    assert_eq!(sent[1].1, "second");
}
