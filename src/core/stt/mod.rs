pub mod elevenlabs;
pub mod openai;

use std::sync::Arc;

pub use elevenlabs::{ElevenLabsSTT, ElevenLabsSTTConfig};
pub use openai::{OpenAISTT, OpenAISTTConfig, OpenAISTTModel};

use crate::config::ServerConfig;
use crate::core::provider::{ProviderError, ProviderResult, SpeechToText};

/// Names accepted by [`create_stt_provider`].
pub const SUPPORTED_STT_PROVIDERS: &[&str] = &["openai", "elevenlabs"];

/// Factory function to create a speech-to-text adapter.
///
/// # Supported Providers
///
/// - `"openai"` - OpenAI transcription API (Whisper)
/// - `"elevenlabs"` - ElevenLabs Scribe
pub fn create_stt_provider(
    provider_type: &str,
    config: &ServerConfig,
) -> ProviderResult<Arc<dyn SpeechToText>> {
    match provider_type.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAISTT::new(OpenAISTTConfig {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: OpenAISTTModel::from_str_or_default(&config.stt_model),
            language: config.stt_language.clone(),
            timeout: config.provider_timeout(),
        })?)),
        "elevenlabs" => Ok(Arc::new(ElevenLabsSTT::new(ElevenLabsSTTConfig {
            api_key: config.elevenlabs_api_key.clone(),
            base_url: config.elevenlabs_base_url.clone(),
            language_code: config.stt_language.clone(),
            timeout: config.provider_timeout(),
            ..Default::default()
        })?)),
        _ => Err(ProviderError::new(
            "config",
            format!(
                "Unsupported STT provider: {provider_type}. Supported providers: {}",
                SUPPORTED_STT_PROVIDERS.join(", ")
            ),
        )),
    }
}
