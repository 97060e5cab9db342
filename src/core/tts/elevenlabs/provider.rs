use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use super::config::ElevenLabsTTSConfig;
use crate::core::provider::{
    ProviderError, ProviderResult, SynthesizedAudio, TextToSpeech, build_http_client,
    ensure_success, require_api_key, transport_error,
};

const PROVIDER: &str = "elevenlabs";

/// ElevenLabs TTS client implementing [`TextToSpeech`].
pub struct ElevenLabsTTS {
    config: ElevenLabsTTSConfig,
    http_client: Client,
}

impl ElevenLabsTTS {
    pub fn new(config: ElevenLabsTTSConfig) -> ProviderResult<Self> {
        if config.voice_id.trim().is_empty() {
            return Err(ProviderError::new(PROVIDER, "Voice ID must not be empty"));
        }
        let http_client = build_http_client(PROVIDER, config.timeout)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ElevenLabsTTSConfig {
        &self.config
    }
}

#[async_trait]
impl TextToSpeech for ElevenLabsTTS {
    async fn synthesize(&self, text: &str) -> ProviderResult<SynthesizedAudio> {
        let api_key = require_api_key(PROVIDER, self.config.api_key.as_deref())?;

        debug!(
            provider = PROVIDER,
            voice_id = %self.config.voice_id,
            model = %self.config.model_id,
            "POST text-to-speech"
        );

        let response = self
            .http_client
            .post(self.config.api_url())
            .query(&[("output_format", self.config.output_format.as_str())])
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, self.config.mime_type())
            .json(&json!({
                "text": text,
                "model_id": self.config.model_id,
            }))
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let response = ensure_success(PROVIDER, response).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(self.config.mime_type())
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        if bytes.is_empty() {
            return Err(ProviderError::new(
                PROVIDER,
                "Text-to-speech API returned no audio",
            ));
        }

        info!(provider = PROVIDER, bytes = bytes.len(), "Speech synthesized");
        Ok(SynthesizedAudio {
            bytes,
            content_type,
        })
    }
}
