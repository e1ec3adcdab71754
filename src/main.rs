#![allow(non_snake_case)]

use std::env;

use fixtureBot::config::{AppConfig, RunMode, Settings};
use fixtureBot::{cli, runtime};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path)?,
        Err(_) => AppConfig::default(),
    };
    let get_prop = |key: &str| -> Option<String> { config.get(key).or_else(|| env::var(key).ok()) };
    let settings = Settings::load(get_prop)?;

    info!(mode = ?settings.run_mode, timezone = %settings.timezone, "starting");
    match settings.run_mode {
        RunMode::Api => runtime::run_api(settings).await,
        RunMode::Cli => cli::cli(settings).await,
    }
}
