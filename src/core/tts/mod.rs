pub mod elevenlabs;
pub mod openai;

use std::sync::Arc;

pub use elevenlabs::{ElevenLabsTTS, ElevenLabsTTSConfig};
pub use openai::{AudioOutputFormat, OpenAITTS, OpenAITTSConfig, OpenAITTSModel, OpenAIVoice};

use crate::config::ServerConfig;
use crate::core::provider::{ProviderError, ProviderResult, TextToSpeech};

/// Names accepted by [`create_tts_provider`].
pub const SUPPORTED_TTS_PROVIDERS: &[&str] = &["elevenlabs", "openai"];

/// Factory function to create a text-to-speech adapter.
///
/// # Supported Providers
///
/// - `"elevenlabs"` - ElevenLabs TTS API
/// - `"openai"` - OpenAI TTS API (tts-1, tts-1-hd, gpt-4o-mini-tts)
pub fn create_tts_provider(
    provider_type: &str,
    config: &ServerConfig,
) -> ProviderResult<Arc<dyn TextToSpeech>> {
    match provider_type.to_lowercase().as_str() {
        "elevenlabs" => Ok(Arc::new(ElevenLabsTTS::new(ElevenLabsTTSConfig {
            api_key: config.elevenlabs_api_key.clone(),
            base_url: config.elevenlabs_base_url.clone(),
            voice_id: config.elevenlabs_voice_id.clone(),
            model_id: config.elevenlabs_model_id.clone(),
            timeout: config.provider_timeout(),
            ..Default::default()
        })?)),
        "openai" => Ok(Arc::new(OpenAITTS::new(OpenAITTSConfig {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            model: OpenAITTSModel::from_str_or_default(&config.openai_tts_model),
            voice: OpenAIVoice::from_str_or_default(&config.openai_tts_voice),
            response_format: AudioOutputFormat::from_str_or_default(&config.openai_tts_format),
            timeout: config.provider_timeout(),
        })?)),
        _ => Err(ProviderError::new(
            "config",
            format!(
                "Unsupported TTS provider: {provider_type}. Supported providers: {}",
                SUPPORTED_TTS_PROVIDERS.join(", ")
            ),
        )),
    }
}
