use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::handlers::sender::MessageSender;
use crate::models::chat_message::ChatMessage;
use crate::service::authorization::AuthorizationPolicy;
use crate::service::date_extractor::DateExtractor;
use crate::service::event_store::{EventStore, StoreError};
use crate::service::message_service::MessageService;
use crate::service::routing::{Intent, IntentRouter};
use crate::tasks::reminder_scheduler::ReminderScheduler;

pub const DEFAULT_REMINDER_LEAD_MINUTES: i64 = 20;

/// Collaborators the dispatcher talks to. Everything outside the store is behind a trait.
pub struct DispatcherDeps {
    pub store: Arc<Mutex<EventStore>>,
    pub sender: Arc<dyn MessageSender>,
    pub dates: Arc<dyn DateExtractor>,
    pub scheduler: Arc<dyn ReminderScheduler>,
    pub authorization: Arc<dyn AuthorizationPolicy>,
}

/// Turns one decoded chat message into at most one store operation and one reply.
pub struct Dispatcher {
    store: Arc<Mutex<EventStore>>,
    sender: Arc<dyn MessageSender>,
    dates: Arc<dyn DateExtractor>,
    scheduler: Arc<dyn ReminderScheduler>,
    authorization: Arc<dyn AuthorizationPolicy>,
    router: IntentRouter,
    messages: MessageService,
    reminder_lead: Duration,
}

impl Dispatcher {
    pub fn new(
        deps: DispatcherDeps,
        router: IntentRouter,
        messages: MessageService,
        reminder_lead: Duration,
    ) -> Self {
        Self {
            store: deps.store,
            sender: deps.sender,
            dates: deps.dates,
            scheduler: deps.scheduler,
            authorization: deps.authorization,
            router,
            messages,
            reminder_lead,
        }
    }

    pub fn store(&self) -> Arc<Mutex<EventStore>> {
        self.store.clone()
    }

    pub async fn dispatch(&self, message: &ChatMessage, now: DateTime<Utc>) -> Intent {
        let intent = self.router.route(&message.text);
        debug!(?intent, sender = %message.sender_name, channel = %message.channel_id, "routed message");
        match intent {
            Intent::CreateOccurrence => {
                if !self.authorization.is_authorized(message) {
                    info!(sender = %message.sender_name, "unauthorized create attempt");
                    self.reply(&message.channel_id, &self.messages.unauthorized(&message.sender_name))
                        .await;
                    return intent;
                }
                match self.dates.parse_date(&message.text, now).await {
                    Some(date) => {
                        self.on_new_occurrence_request(&message.sender_name, date, &message.channel_id, now)
                            .await;
                    }
                    None => debug!(text = %message.text, "no date found, ignoring create request"),
                }
            }
            Intent::Signup => {
                self.on_signup_request(&message.sender_name, &message.channel_id, now).await;
            }
            Intent::ListAttendees => self.on_list_attendees_query(&message.channel_id, now).await,
            Intent::ListOccurrences => self.on_list_occurrences_query(&message.channel_id).await,
            Intent::NextOccurrence => self.on_next_occurrence_query(&message.channel_id, now).await,
            Intent::Unknown => {}
        }
        intent
    }

    /// Adds the occurrence and arms its reminder `reminder_lead` before the start.
    pub async fn on_new_occurrence_request(
        &self,
        sender: &str,
        date: DateTime<Utc>,
        channel_id: &str,
        now: DateTime<Utc>,
    ) {
        let added = {
            let mut store = self.store.lock().await;
            store.add(date)
        };
        let occurrence = match added {
            Ok(occurrence) => occurrence,
            Err(err) => {
                if !matches!(err, StoreError::DuplicateOccurrence(_)) {
                    warn!(error = %err, "unexpected store error on add");
                }
                self.reply(channel_id, &self.messages.occurrence_not_added(&err, &date)).await;
                return;
            }
        };
        info!(date = %occurrence.date, %sender, "occurrence created");
        self.reply(channel_id, &self.messages.occurrence_created(&occurrence.date)).await;

        let trigger_at = occurrence.date - self.reminder_lead;
        if trigger_at <= now {
            info!(date = %occurrence.date, "reminder lead already elapsed, firing immediately");
        }
        let reminder_id = self.scheduler.schedule(
            trigger_at,
            channel_id,
            self.messages.reminder(),
        );
        debug!(reminder = %reminder_id, %trigger_at, "reminder scheduled");
    }

    pub async fn on_signup_request(&self, sender: &str, channel_id: &str, now: DateTime<Utc>) {
        let result = {
            let mut store = self.store.lock().await;
            let next = store.next_occurrence(now).map(|o| o.date);
            store
                .add_participant(sender, next, now)
                .map(|added| (added, next))
        };
        let body = match result {
            Ok((true, Some(date))) => self.messages.signed_up(sender, &date, &now),
            Ok(_) => self.messages.already_signed_up(sender),
            Err(_) => self.messages.nothing_to_join(),
        };
        self.reply(channel_id, &body).await;
    }

    pub async fn on_next_occurrence_query(&self, channel_id: &str, now: DateTime<Utc>) {
        let body = {
            let store = self.store.lock().await;
            self.messages.next_occurrence(store.next_occurrence(now), &now)
        };
        self.reply(channel_id, &body).await;
    }

    pub async fn on_list_occurrences_query(&self, channel_id: &str) {
        let body = {
            let store = self.store.lock().await;
            self.messages.fixture_list(&store.sorted_all())
        };
        self.reply(channel_id, &body).await;
    }

    pub async fn on_list_attendees_query(&self, channel_id: &str, now: DateTime<Utc>) {
        let body = {
            let store = self.store.lock().await;
            let attendees = store.list_participants(None, now);
            match (attendees, store.next_occurrence(now)) {
                (Ok(attendees), Some(next)) => self.messages.attendees(&attendees, &next.date, &now),
                _ => self.messages.no_upcoming_roster(),
            }
        };
        self.reply(channel_id, &body).await;
    }

    async fn reply(&self, channel_id: &str, body: &str) {
        if let Err(err) = self.sender.send_message(channel_id, body).await {
            warn!(channel = %channel_id, error = %err, "failed to deliver reply");
        }
    }
}
