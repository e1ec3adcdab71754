use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serenity::async_trait;
use tracing::{debug, warn};

use crate::service::openai_service::OpenAIClient;

#[async_trait]
pub trait DateExtractor: Send + Sync {
    /// Resolves the first date/time the text mentions, relative to `now` where needed.
    async fn parse_date(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

static RFC3339_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|z|[+-]\d{2}:\d{2})")
        .expect("Invalid regex")
});
static LOCAL_DATETIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})[T ](\d{1,2}):(\d{2})\b").expect("Invalid regex")
});
static RELATIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(today|tonight|tomorrow)\s+at\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b")
        .expect("Invalid regex")
});

/// Recognises explicit timestamps and a few fixed relative phrases. Wall-clock
/// forms are read in the configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct LiteralDateExtractor {
    timezone: Tz,
}

impl LiteralDateExtractor {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn extract(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(found) = RFC3339_PATTERN.find(text) {
            if let Ok(date) = DateTime::parse_from_rfc3339(found.as_str()) {
                return Some(date.with_timezone(&Utc));
            }
        }
        if let Some(caps) = LOCAL_DATETIME_PATTERN.captures(text) {
            if let Some(date) = self.local_datetime(&caps) {
                return Some(date);
            }
        }
        RELATIVE_PATTERN
            .captures(text)
            .and_then(|caps| self.relative_datetime(&caps, now))
    }

    fn local_datetime(&self, caps: &Captures) -> Option<DateTime<Utc>> {
        let date = NaiveDate::from_ymd_opt(number(caps, 1)?, number(caps, 2)?, number(caps, 3)?)?;
        let naive = date.and_hms_opt(number(caps, 4)?, number(caps, 5)?, 0)?;
        self.to_utc(naive)
    }

    fn relative_datetime(&self, caps: &Captures, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let day = caps.get(1)?.as_str().to_lowercase();
        let mut hour: u32 = number(caps, 2)?;
        let minute: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
        match caps.get(4).map(|m| m.as_str().to_lowercase()).as_deref() {
            Some("am") if hour == 12 => hour = 0,
            Some("pm") if hour < 12 => hour += 12,
            None if day == "tonight" && hour < 12 => hour += 12,
            _ => {}
        }

        let today = now.with_timezone(&self.timezone).date_naive();
        let date = if day == "tomorrow" {
            today + Duration::days(1)
        } else {
            today
        };
        self.to_utc(date.and_hms_opt(hour, minute, 0)?)
    }

    fn to_utc(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}

fn number<T: std::str::FromStr>(caps: &Captures, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

#[async_trait]
impl DateExtractor for LiteralDateExtractor {
    async fn parse_date(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.extract(text, now)
    }
}

#[derive(Serialize)]
struct ExtractionInput<'a> {
    reference_time: String,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtractionPayload {
    time: Option<DateTime<FixedOffset>>,
}

/// Asks the LLM for the date; falls back to literal parsing when the call fails or finds nothing.
pub struct OpenAIDateExtractor {
    openai: Arc<dyn OpenAIClient>,
    fallback: LiteralDateExtractor,
}

impl OpenAIDateExtractor {
    pub fn new(openai: Arc<dyn OpenAIClient>, fallback: LiteralDateExtractor) -> Self {
        Self { openai, fallback }
    }
}

#[async_trait]
impl DateExtractor for OpenAIDateExtractor {
    async fn parse_date(&self, text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let input = ExtractionInput {
            reference_time: now.to_rfc3339(),
            message: text,
        };
        let structured = match serde_json::to_string(&input) {
            Ok(v) => v,
            Err(_) => return self.fallback.extract(text, now),
        };

        let payload = match self.openai.generate_prompt(&structured, "occurrence_date").await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "date extraction call failed, using literal parser");
                return self.fallback.extract(text, now);
            }
        };
        match serde_json::from_str::<ExtractionPayload>(payload.trim()) {
            Ok(parsed) => {
                debug!(?parsed, "extracted date");
                match parsed.time {
                    Some(time) => Some(time.with_timezone(&Utc)),
                    None => self.fallback.extract(text, now),
                }
            }
            Err(err) => {
                warn!(error = %err, payload = %payload, "unparseable date payload, using literal parser");
                self.fallback.extract(text, now)
            }
        }
    }
}
