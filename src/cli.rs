use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::Text;
use serde::Deserialize;
use tracing::warn;

use crate::config::Settings;
use crate::handlers::sender::ConsoleSender;
use crate::models::chat_message::ChatMessage;
use crate::runtime::build_dispatcher;
use crate::service::dispatcher::Dispatcher;

#[derive(Parser)]
#[command(about = "Schedule informal games from chat messages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type chat messages interactively as a single user.
    Repl {
        #[arg(long, default_value = "organiser")]
        user: String,
        #[arg(long, default_value = "general")]
        channel: String,
    },
    /// Replay a JSONL file of {"user", "channel", "text"} lines.
    Script { path: PathBuf },
}

#[derive(Debug, Deserialize)]
pub struct ScriptLine {
    pub user: String,
    pub channel: String,
    pub text: String,
}

impl ScriptLine {
    pub fn into_message(self) -> ChatMessage {
        ChatMessage {
            sender_id: self.user.clone(),
            sender_name: self.user,
            channel_id: self.channel,
            text: self.text,
        }
    }
}

pub async fn cli(settings: Settings) -> anyhow::Result<()> {
    // Fine to exit on bad arguments here
    let cli = Cli::parse();
    let dispatcher = build_dispatcher(&settings, Arc::new(ConsoleSender))?;
    match cli.command {
        Commands::Repl { user, channel } => repl(&dispatcher, &user, &channel).await,
        Commands::Script { path } => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            run_script(&dispatcher, &content).await
        }
    }
}

async fn repl(dispatcher: &Dispatcher, user: &str, channel: &str) -> anyhow::Result<()> {
    println!("Chatting as {} in #{}. Submit an empty line to quit.", user, channel);
    loop {
        let line = match Text::new(&format!("{}>", user)).prompt() {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            break;
        }
        dispatcher
            .dispatch(&ChatMessage::new(user, user, channel, &line), Utc::now())
            .await;
    }
    Ok(())
}

/// Dispatches every non-blank line in order. Malformed lines are skipped with a warning.
pub async fn run_script(dispatcher: &Dispatcher, content: &str) -> anyhow::Result<()> {
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ScriptLine>(line) {
            Ok(step) => {
                dispatcher.dispatch(&step.into_message(), Utc::now()).await;
            }
            Err(err) => warn!(line = idx + 1, error = %err, "skipping malformed script line"),
        }
    }
    Ok(())
}
