use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use fixtureBot::handlers::sender::{MessageSender, SendError};
use fixtureBot::models::chat_message::ChatMessage;
use fixtureBot::service::authorization::AdminList;
use fixtureBot::service::date_extractor::LiteralDateExtractor;
use fixtureBot::service::dispatcher::{Dispatcher, DispatcherDeps};
use fixtureBot::service::event_store::EventStore;
use fixtureBot::service::message_service::MessageService;
use fixtureBot::service::routing::{Intent, IntentRouter};
use fixtureBot::tasks::reminder_scheduler::{ReminderId, ReminderScheduler};
use tokio::sync::Mutex;

#[derive(Default)]
struct MockSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl MockSender {
    async fn bodies(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|(_, body)| body.clone()).collect()
    }

    async fn last(&self) -> Option<(String, String)> {
        self.sent.lock().await.last().cloned()
    }
}

#[serenity::async_trait]
impl MessageSender for MockSender {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), SendError> {
        let mut sent = self.sent.lock().await;
        sent.push((channel_id.to_string(), content.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingScheduler {
    scheduled: StdMutex<Vec<(DateTime<Utc>, String, String)>>,
}

impl ReminderScheduler for RecordingScheduler {
    fn schedule(&self, trigger_at: DateTime<Utc>, channel_id: &str, content: String) -> ReminderId {
        let mut scheduled = self.scheduled.lock().unwrap();
        scheduled.push((trigger_at, channel_id.to_string(), content));
        format!("reminder-{}", scheduled.len())
    }

    fn cancel(&self, _id: &str) -> bool {
        false
    }
}

struct Harness {
    dispatcher: Dispatcher,
    sender: Arc<MockSender>,
    scheduler: Arc<RecordingScheduler>,
}

impl Harness {
    fn new() -> Self {
        let sender = Arc::new(MockSender::default());
        let scheduler = Arc::new(RecordingScheduler::default());
        let deps = DispatcherDeps {
            store: Arc::new(Mutex::new(EventStore::new())),
            sender: sender.clone(),
            dates: Arc::new(LiteralDateExtractor::new(Tz::UTC)),
            scheduler: scheduler.clone(),
            authorization: Arc::new(AdminList::new(["organiser"])),
        };
        let dispatcher = Dispatcher::new(
            deps,
            IntentRouter::new("fixturebot").unwrap(),
            MessageService::new(Tz::UTC),
            Duration::minutes(20),
        );
        Self {
            dispatcher,
            sender,
            scheduler,
        }
    }

    async fn say(&self, user: &str, text: &str) -> Intent {
        self.dispatcher
            .dispatch(&ChatMessage::new(user, user, "pitch", text), now())
            .await
    }

    async fn store_len(&self) -> usize {
        self.dispatcher.store().lock().await.len()
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn organiser_creates_occurrence_and_reminder_is_scheduled() {
    let harness = Harness::new();
    let intent = harness.say("organiser", "fixturebot game at 2026-10-16T18:00:00Z").await;

    assert_eq!(intent, Intent::CreateOccurrence);
    assert_eq!(harness.store_len().await, 1);
    assert_eq!(
        harness.sender.last().await,
        Some((
            "pitch".to_string(),
            "Ok, I'll see who can play on Oct 16, 2026 6:00 PM.".to_string()
        ))
    );

    let scheduled = harness.scheduler.scheduled.lock().unwrap().clone();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].0, Utc.with_ymd_and_hms(2026, 10, 16, 17, 40, 0).unwrap());
    assert_eq!(scheduled[0].1, "pitch");
    assert!(scheduled[0].2.contains("@here"));
}

#[tokio::test]
async fn duplicate_occurrence_is_reported_not_added() {
    let harness = Harness::new();
    harness.say("organiser", "fixturebot 2026-10-16T18:00:00Z").await;
    harness.say("organiser", "fixturebot again 2026-10-16T18:00:00Z").await;

    assert_eq!(harness.store_len().await, 1);
    assert_eq!(harness.scheduler.scheduled.lock().unwrap().len(), 1);
    assert_eq!(
        harness.sender.bodies().await.last().map(String::as_str),
        Some("There's already a game on Oct 16, 2026 6:00 PM.")
    );
}

#[tokio::test]
async fn unauthorized_sender_is_refused_before_parsing() {
    let harness = Harness::new();
    harness.say("player", "fixturebot 2026-10-16T18:00:00Z").await;

    assert_eq!(harness.store_len().await, 0);
    assert!(harness.scheduler.scheduled.lock().unwrap().is_empty());
    assert_eq!(
        harness.sender.bodies().await,
        vec!["Sorry player, only organisers can schedule games.".to_string()]
    );
}

#[tokio::test]
async fn create_without_a_date_is_a_silent_no_op() {
    let harness = Harness::new();
    let intent = harness.say("organiser", "fixturebot sometime soon").await;

    assert_eq!(intent, Intent::CreateOccurrence);
    assert_eq!(harness.store_len().await, 0);
    assert!(harness.sender.bodies().await.is_empty());
}

#[tokio::test]
async fn reminder_inside_lead_interval_is_still_scheduled() {
    let harness = Harness::new();
    harness.say("organiser", "fixturebot today at 12:10").await;

    let scheduled = harness.scheduler.scheduled.lock().unwrap().clone();
    assert_eq!(scheduled.len(), 1);
    assert!(scheduled[0].0 < now());
}

#[tokio::test]
async fn signup_without_upcoming_occurrence_gets_friendly_reply() {
    let harness = Harness::new();
    harness.say("alice", "I'm in").await;

    assert_eq!(
        harness.sender.bodies().await,
        vec!["There's no upcoming game to sign up for yet.".to_string()]
    );
}

#[tokio::test]
async fn signup_is_idempotent() {
    let harness = Harness::new();
    harness.say("organiser", "fixturebot today at 18:00").await;
    harness.say("alice", "I'm in").await;
    harness.say("alice", "I'll play").await;

    let bodies = harness.sender.bodies().await;
    assert_eq!(bodies[1], "Great alice, you're signed up for the game today at 18:00!");
    assert_eq!(bodies[2], "You've already signed up alice.");

    let store = harness.dispatcher.store();
    let store = store.lock().await;
    assert_eq!(store.list_participants(None, now()).unwrap(), vec!["alice".to_string()]);
}

#[tokio::test]
async fn next_game_query_handles_absence_then_presence() {
    let harness = Harness::new();
    harness.say("bob", "when's the next game?").await;
    harness.say("organiser", "fixturebot tomorrow at 18:00").await;
    harness.say("organiser", "fixturebot today at 19:30").await;
    harness.say("bob", "next game?").await;

    let bodies = harness.sender.bodies().await;
    assert_eq!(bodies[0], "There's no upcoming game planned.");
    assert_eq!(bodies.last().map(String::as_str), Some("The next game is today at 19:30."));
}

#[tokio::test]
async fn past_occurrences_are_never_next() {
    let harness = Harness::new();
    harness
        .dispatcher
        .store()
        .lock()
        .await
        .add(now() - Duration::hours(1))
        .unwrap();

    harness.say("bob", "next game").await;
    harness.say("bob", "who's playing").await;

    assert_eq!(
        harness.sender.bodies().await,
        vec![
            "There's no upcoming game planned.".to_string(),
            "There's no upcoming game, so nobody is playing yet.".to_string(),
        ]
    );
}

#[tokio::test]
async fn fixture_list_is_sorted() {
    let harness = Harness::new();
    harness.say("organiser", "fixturebot 2026-10-23T18:00:00Z").await;
    harness.say("organiser", "fixturebot 2026-10-19T18:00:00Z").await;
    harness.say("bob", "fixture list please").await;

    let body = harness.sender.bodies().await.last().cloned().unwrap();
    assert!(body.starts_with("There are 2 planned:"));
    let first = body.find("Mon, Oct 19, 2026").unwrap();
    let second = body.find("Fri, Oct 23, 2026").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn attendee_listing_reflects_roster_size() {
    let harness = Harness::new();
    harness.say("organiser", "fixturebot today at 18:00").await;

    harness.say("bob", "who is playing?").await;
    assert_eq!(
        harness.sender.bodies().await.last().map(String::as_str),
        Some("Nobody has signed up yet!")
    );

    for name in ["p1", "p2", "p3", "p4", "p5", "p6", "p7"] {
        harness.say(name, "im in").await;
    }
    harness.say("bob", "who's playing").await;
    let body = harness.sender.bodies().await.last().cloned().unwrap();
    assert!(body.starts_with("So far we've got 7 - p1, p2, p3, p4, p5, p6 and p7 for the game today at 18:00."));
    assert!(body.ends_with("Someone needs to make these teams even."));

    for name in ["p8", "p9", "p10"] {
        harness.say(name, "I'm playing").await;
    }
    harness.say("bob", "who's playing").await;
    let body = harness.sender.bodies().await.last().cloned().unwrap();
    assert!(body.starts_with("So far we've got 10"));
    assert!(body.ends_with("Hmm. That's over ten."));
}

#[tokio::test]
async fn chatter_gets_no_reply() {
    let harness = Harness::new();
    assert_eq!(harness.say("bob", "what a match last night").await, Intent::Unknown);
    assert!(harness.sender.bodies().await.is_empty());
}
