use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

use super::config::ElevenLabsSTTConfig;
use crate::core::provider::{
    AudioUpload, ProviderError, ProviderResult, SpeechToText, Transcription, build_http_client,
    read_json, require_api_key, transport_error,
};

const PROVIDER: &str = "elevenlabs";

/// ElevenLabs Scribe client implementing [`SpeechToText`].
pub struct ElevenLabsSTT {
    config: ElevenLabsSTTConfig,
    http_client: Client,
}

impl ElevenLabsSTT {
    pub fn new(config: ElevenLabsSTTConfig) -> ProviderResult<Self> {
        let http_client = build_http_client(PROVIDER, config.timeout)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &ElevenLabsSTTConfig {
        &self.config
    }
}

#[async_trait]
impl SpeechToText for ElevenLabsSTT {
    async fn transcribe(&self, upload: &AudioUpload) -> ProviderResult<Transcription> {
        let api_key = require_api_key(PROVIDER, self.config.api_key.as_deref())?;

        let file_part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.filename.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| ProviderError::new(PROVIDER, format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .text("model_id", self.config.model_id.clone())
            .part("file", file_part);
        if let Some(ref language_code) = self.config.language_code {
            form = form.text("language_code", language_code.clone());
        }

        debug!(
            provider = PROVIDER,
            model = %self.config.model_id,
            bytes = upload.bytes.len(),
            "Sending audio to speech-to-text API"
        );

        let response = self
            .http_client
            .post(self.config.api_url())
            .header("xi-api-key", api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let raw = read_json(PROVIDER, response).await?;
        let text = raw
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::new(PROVIDER, "Response is missing the 'text' field"))?
            .trim()
            .to_string();

        info!(
            provider = PROVIDER,
            chars = text.chars().count(),
            "Transcription complete"
        );

        Ok(Transcription { text, raw })
    }
}
