use std::time::Duration;

use crate::core::OPENAI_API_BASE;

/// Path of the chat completions endpoint relative to the API base URL
pub const OPENAI_CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Default completion model
pub const OPENAI_DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat completion adapter configuration.
#[derive(Debug, Clone)]
pub struct OpenAIChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Optional system message sent ahead of every user message
    pub system_prompt: Option<String>,
    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl Default for OpenAIChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENAI_API_BASE.to_string(),
            model: OPENAI_DEFAULT_CHAT_MODEL.to_string(),
            system_prompt: None,
            temperature: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAIChatConfig {
    pub fn api_url(&self) -> String {
        crate::core::provider::endpoint(&self.base_url, OPENAI_CHAT_COMPLETIONS_PATH)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Chat model must not be empty".to_string());
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(format!(
                    "Temperature must be between 0.0 and 2.0, got {temperature}"
                ));
            }
        }
        Ok(())
    }
}
