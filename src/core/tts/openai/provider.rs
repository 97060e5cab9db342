//! OpenAI TTS provider implementation.
//!
//! - Endpoint: `POST https://api.openai.com/v1/audio/speech`
//! - Output: the encoded audio file in the response body

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use super::config::OpenAITTSConfig;
use crate::core::provider::{
    ProviderError, ProviderResult, SynthesizedAudio, TextToSpeech, build_http_client,
    ensure_success, require_api_key, transport_error,
};

const PROVIDER: &str = "openai";

/// OpenAI TTS client implementing [`TextToSpeech`].
pub struct OpenAITTS {
    config: OpenAITTSConfig,
    http_client: Client,
}

impl OpenAITTS {
    pub fn new(config: OpenAITTSConfig) -> ProviderResult<Self> {
        let http_client = build_http_client(PROVIDER, config.timeout)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &OpenAITTSConfig {
        &self.config
    }
}

#[async_trait]
impl TextToSpeech for OpenAITTS {
    async fn synthesize(&self, text: &str) -> ProviderResult<SynthesizedAudio> {
        let api_key = require_api_key(PROVIDER, self.config.api_key.as_deref())?;

        let body = json!({
            "model": self.config.model.as_str(),
            "input": text,
            "voice": self.config.voice.as_str(),
            "response_format": self.config.response_format.as_str(),
        });

        debug!(
            provider = PROVIDER,
            model = self.config.model.as_str(),
            voice = self.config.voice.as_str(),
            "POST speech synthesis"
        );

        let response = self
            .http_client
            .post(self.config.api_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let response = ensure_success(PROVIDER, response).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(self.config.response_format.mime_type())
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        if bytes.is_empty() {
            return Err(ProviderError::new(PROVIDER, "Speech API returned no audio"));
        }

        info!(provider = PROVIDER, bytes = bytes.len(), "Speech synthesized");
        Ok(SynthesizedAudio {
            bytes,
            content_type,
        })
    }
}
