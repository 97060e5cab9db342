pub mod openai;

use std::sync::Arc;

pub use openai::{OpenAIChat, OpenAIChatConfig};

use crate::config::ServerConfig;
use crate::core::provider::{ChatModel, ProviderResult};

/// Create the chat completion adapter used by the pipeline.
pub fn create_chat_model(config: &ServerConfig) -> ProviderResult<Arc<dyn ChatModel>> {
    Ok(Arc::new(OpenAIChat::new(OpenAIChatConfig {
        api_key: config.openai_api_key.clone(),
        base_url: config.openai_base_url.clone(),
        model: config.llm_model.clone(),
        system_prompt: config.llm_system_prompt.clone(),
        temperature: config.llm_temperature,
        timeout: config.provider_timeout(),
    })?))
}
