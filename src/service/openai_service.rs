use crate::clients::openai_client::{self, OpenAIError};
use serenity::async_trait;

#[async_trait]
pub trait OpenAIClient: Send + Sync {
    async fn generate_prompt(&self, prompt: &str, prompt_type: &str) -> Result<String, OpenAIError>;
}

pub struct OpenAIService {
    api_key: String,
    timezone: String,
}

impl OpenAIService {
    pub fn new(api_key: String, timezone: String) -> Self {
        Self { api_key, timezone }
    }
}

#[async_trait]
impl OpenAIClient for OpenAIService {
    async fn generate_prompt(&self, prompt: &str, prompt_type: &str) -> Result<String, OpenAIError> {
        openai_client::generate_openai_prompt(prompt, prompt_type, &self.api_key, &self.timezone).await
    }
}
