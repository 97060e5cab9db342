use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::config::OpenAIChatConfig;
use super::messages::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::core::provider::{
    ChatModel, ProviderError, ProviderResult, build_http_client, ensure_success, require_api_key,
    transport_error,
};

const PROVIDER: &str = "openai";

/// OpenAI Chat Completions client implementing [`ChatModel`].
pub struct OpenAIChat {
    config: OpenAIChatConfig,
    http_client: Client,
}

impl OpenAIChat {
    pub fn new(config: OpenAIChatConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|e| ProviderError::new(PROVIDER, e))?;
        let http_client = build_http_client(PROVIDER, config.timeout)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &OpenAIChatConfig {
        &self.config
    }

    fn build_messages(&self, message: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref prompt) = self.config.system_prompt {
            messages.push(ChatMessage::system(prompt.clone()));
        }
        messages.push(ChatMessage::user(message));
        messages
    }
}

#[async_trait]
impl ChatModel for OpenAIChat {
    async fn reply(&self, message: &str) -> ProviderResult<String> {
        let api_key = require_api_key(PROVIDER, self.config.api_key.as_deref())?;

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: self.build_messages(message),
            temperature: self.config.temperature,
        };

        debug!(provider = PROVIDER, model = %self.config.model, "POST chat completion");

        let response = self
            .http_client
            .post(self.config.api_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let completion: ChatCompletionResponse = ensure_success(PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::new(PROVIDER, format!("Failed to parse response: {e}")))?;

        let reply = completion
            .first_content()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProviderError::new(PROVIDER, "Chat completion returned no content"))?
            .to_string();

        info!(
            provider = PROVIDER,
            chars = reply.chars().count(),
            "Chat completion received"
        );

        Ok(reply)
    }
}
