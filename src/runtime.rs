use std::sync::Arc;

use anyhow::Context as _;
use chrono::Duration;
use serenity::model::gateway::GatewayIntents;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::events::queue::EventBus;
use crate::events::worker::run_event_worker;
use crate::handlers::discord::BotHandler;
use crate::handlers::sender::{DiscordSender, MessageSender};
use crate::service::authorization::AdminList;
use crate::service::date_extractor::{DateExtractor, LiteralDateExtractor, OpenAIDateExtractor};
use crate::service::dispatcher::{Dispatcher, DispatcherDeps};
use crate::service::event_store::EventStore;
use crate::service::message_service::MessageService;
use crate::service::openai_service::OpenAIService;
use crate::service::routing::IntentRouter;
use crate::tasks::reminder_scheduler::TokioReminderScheduler;
use crate::tasks::task_runner::TaskRunner;

const EVENT_BUS_CAPACITY: usize = 64;

/// Wires a dispatcher around a fresh, empty store and the given outbound sender.
pub fn build_dispatcher(settings: &Settings, sender: Arc<dyn MessageSender>) -> anyhow::Result<Dispatcher> {
    let router = IntentRouter::new(&settings.bot_name)
        .with_context(|| format!("invalid BOT_NAME {:?}", settings.bot_name))?;

    let literal = LiteralDateExtractor::new(settings.timezone);
    let dates: Arc<dyn DateExtractor> = match &settings.openai_api_key {
        Some(key) => {
            let openai = OpenAIService::new(key.clone(), settings.timezone.name().to_string());
            Arc::new(OpenAIDateExtractor::new(Arc::new(openai), literal))
        }
        None => {
            info!("OPENAI_API_KEY not set, only literal dates are understood");
            Arc::new(literal)
        }
    };

    let admins = AdminList::new(&settings.admins);
    if admins.is_empty() {
        warn!("ADMINS is empty, nobody can schedule games");
    }

    let deps = DispatcherDeps {
        store: Arc::new(Mutex::new(EventStore::new())),
        sender: sender.clone(),
        dates,
        scheduler: Arc::new(TokioReminderScheduler::new(sender)),
        authorization: Arc::new(admins),
    };
    Ok(Dispatcher::new(
        deps,
        router,
        MessageService::new(settings.timezone),
        Duration::minutes(settings.reminder_lead_minutes),
    ))
}

pub async fn run_api(settings: Settings) -> anyhow::Result<()> {
    let token = settings
        .discord_token
        .clone()
        .context("DISCORD_TOKEN must be set for api mode")?;

    let sender: Arc<dyn MessageSender> = Arc::new(DiscordSender::new(&token));
    let dispatcher = Arc::new(build_dispatcher(&settings, sender)?);
    let (event_bus, rx) = EventBus::new(EVENT_BUS_CAPACITY);

    let mut task_runner = TaskRunner::new();
    task_runner.add_task("event_worker", move || {
        tokio::spawn(run_event_worker(rx, dispatcher));
    });
    task_runner.start_all();

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::Client::builder(token, intents)
        .event_handler(BotHandler::new(event_bus))
        .await
        .context("error creating Serenity client")?;

    if let Err(why) = client.start().await {
        error!(error = ?why, "client error");
        return Err(why.into());
    }
    Ok(())
}
