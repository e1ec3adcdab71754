use std::collections::HashMap;
use std::fs;

use chrono_tz::Tz;
use thiserror::Error;

use crate::service::dispatcher::DEFAULT_REMINDER_LEAD_MINUTES;

const DEFAULT_BOT_NAME: &str = "fixturebot";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("{key} must be set")]
    Missing { key: &'static str },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Cli,
    Api,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub run_mode: RunMode,
    pub discord_token: Option<String>,
    pub openai_api_key: Option<String>,
    pub bot_name: String,
    pub admins: Vec<String>,
    pub reminder_lead_minutes: i64,
    pub timezone: Tz,
}

impl Settings {
    /// Builds settings from a key lookup (config file first, then environment in `main`).
    pub fn load<F>(get_prop: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get_prop(key).filter(|v| !v.trim().is_empty());

        let run_mode = match non_empty("RUN_MODE").as_deref() {
            None | Some("cli") => RunMode::Cli,
            Some("api") => RunMode::Api,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "RUN_MODE",
                    value: other.to_string(),
                });
            }
        };

        let discord_token = non_empty("DISCORD_TOKEN");
        if run_mode == RunMode::Api && discord_token.is_none() {
            return Err(ConfigError::Missing { key: "DISCORD_TOKEN" });
        }

        let reminder_lead_minutes = match non_empty("REMINDER_LEAD_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes >= 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "REMINDER_LEAD_MINUTES",
                    value: raw.clone(),
                })?,
            None => DEFAULT_REMINDER_LEAD_MINUTES,
        };

        let timezone = match non_empty("DISPLAY_TIMEZONE") {
            Some(raw) => raw.trim().parse::<Tz>().map_err(|_| ConfigError::InvalidValue {
                key: "DISPLAY_TIMEZONE",
                value: raw.clone(),
            })?,
            None => Tz::UTC,
        };

        let admins = non_empty("ADMINS")
            .map(|raw| {
                raw.split(',')
                    .map(|admin| admin.trim().to_string())
                    .filter(|admin| !admin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            run_mode,
            discord_token,
            openai_api_key: non_empty("OPENAI_API_KEY"),
            bot_name: non_empty("BOT_NAME").unwrap_or(DEFAULT_BOT_NAME.to_string()),
            admins,
            reminder_lead_minutes,
            timezone,
        })
    }
}
