//! OpenAI transcription client.
//!
//! Sends the uploaded file as-is to `POST /v1/audio/transcriptions` in a single
//! multipart request and normalizes the `json` response.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use super::config::OpenAISTTConfig;
use super::messages::TranscriptionResponse;
use crate::core::provider::{
    AudioUpload, ProviderError, ProviderResult, SpeechToText, Transcription, build_http_client,
    read_json, require_api_key, transport_error,
};

const PROVIDER: &str = "openai";

/// OpenAI STT client implementing [`SpeechToText`].
pub struct OpenAISTT {
    config: OpenAISTTConfig,
    /// HTTP client for API requests (reused for connection pooling).
    http_client: Client,
}

impl OpenAISTT {
    pub fn new(config: OpenAISTTConfig) -> ProviderResult<Self> {
        let http_client = build_http_client(PROVIDER, config.timeout)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &OpenAISTTConfig {
        &self.config
    }

    fn build_form(&self, upload: &AudioUpload) -> ProviderResult<Form> {
        let file_part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.filename.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| ProviderError::new(PROVIDER, format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.config.model.as_str().to_string())
            .text("response_format", "json");

        if let Some(ref language) = self.config.language {
            form = form.text("language", language.clone());
        }

        Ok(form)
    }
}

#[async_trait]
impl SpeechToText for OpenAISTT {
    async fn transcribe(&self, upload: &AudioUpload) -> ProviderResult<Transcription> {
        let api_key = require_api_key(PROVIDER, self.config.api_key.as_deref())?;
        let form = self.build_form(upload)?;

        debug!(
            provider = PROVIDER,
            model = %self.config.model,
            bytes = upload.bytes.len(),
            "Sending audio to transcription API"
        );

        let response = self
            .http_client
            .post(self.config.api_url())
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let raw = read_json(PROVIDER, response).await?;
        let parsed: TranscriptionResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::new(PROVIDER, format!("Unexpected response shape: {e}")))?;

        let text = parsed.text.trim().to_string();
        info!(
            provider = PROVIDER,
            chars = text.chars().count(),
            "Transcription complete"
        );

        Ok(Transcription { text, raw })
    }
}
