use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Error)]
pub enum OpenAIError {
    #[error("not a valid base prompt: {0}")]
    UnknownPrompt(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no response from OpenAI")]
    Empty,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

pub async fn generate_openai_prompt(
    prompt: &str,
    prompt_type: &str,
    api_key: &str,
    timezone: &str,
) -> Result<String, OpenAIError> {
    let full_prompt = match prompt_type {
        "occurrence_date" => format!(
            "You are a date extraction engine for a chat bot that schedules football games.\n\
             User timezone: {timezone}\n\
             Task: The structured input below holds a chat message and the reference time it was sent at.\n\
             Extract the single date and time the message schedules a game for.\n\
             Rules:\n\
             - Resolve relative phrases (\"tomorrow at 6\", \"next Friday\", \"in two days\") against the reference time.\n\
             - \"Friday\" or \"this Friday\" means the next occurrence of that weekday on or after the reference date.\n\
             - If a date is given without a time, use 18:00 in the user's timezone.\n\
             - If the year is omitted, assume the next occurrence of that date on or after the reference date.\n\
             - If the message contains no date or time at all, return null for time. Never guess one.\n\
             - Output ONLY raw JSON, no prose, markdown, or code fences.\n\
             - The JSON shape must be exactly:\n\
             {{\"time\":\"<RFC3339 datetime>\"|null}}\n\
             Structured input:\n\
             {structured}",
            timezone = timezone,
            structured = prompt
        ),
        other => return Err(OpenAIError::UnknownPrompt(other.to_string())),
    };

    query_openai(full_prompt, api_key).await
}

async fn query_openai(prompt: String, api_key: &str) -> Result<String, OpenAIError> {
    let request = OpenAIRequest {
        model: "gpt-4o-mini".to_string(),
        messages: vec![
            OpenAIMessage {
                role: "system".to_string(),
                content: "You are a strict JSON date extraction engine. Reply ONLY with a single JSON object, with no markdown, no backticks, and no extra text.".to_string(),
            },
            OpenAIMessage {
                role: "user".to_string(),
                content: prompt,
            },
        ],
        max_tokens: 200,
        temperature: 0.0,
    };

    let client = reqwest::Client::new();
    let response = client
        .post(COMPLETIONS_URL)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        warn!(%status, body = %text, "OpenAI request failed");
        return Err(OpenAIError::Status(status));
    }

    let parsed: OpenAIResponse = serde_json::from_str(&text)?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(OpenAIError::Empty)
}
