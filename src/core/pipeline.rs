//! Linear request pipeline: transcription, generation, synthesis.
//!
//! Each request walks `Received → Authenticated → Validated → Processing →
//! Responded`; any failure moves it to the absorbing `Failed` stage. The
//! pipeline itself only covers `Processing`: adapters are called one after
//! another and the first error ends the request. There are no retries and no
//! partial results.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::provider::{
    AudioPublisher, AudioUpload, ChatModel, ProviderError, ProviderResult, SpeechToText,
    SynthesizedAudio, TextToSpeech, Transcription,
};

/// Lifecycle stage of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Authenticated,
    Validated,
    Processing,
    Responded,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Authenticated => "authenticated",
            Self::Validated => "validated",
            Self::Processing => "processing",
            Self::Responded => "responded",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Responded | Self::Failed)
    }

    /// Record that a request on `route` entered this stage.
    pub fn trace(self, route: &str) {
        debug!(route, stage = self.as_str(), "Request stage");
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body returned by `/text` and `/api/voice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    pub reply: String,
    pub audio_url: String,
}

/// The provider adapters a request is relayed through.
#[derive(Clone)]
pub struct VoicePipeline {
    stt: Arc<dyn SpeechToText>,
    llm: Arc<dyn ChatModel>,
    tts: Arc<dyn TextToSpeech>,
    publisher: Arc<dyn AudioPublisher>,
}

impl VoicePipeline {
    pub fn new(
        stt: Arc<dyn SpeechToText>,
        llm: Arc<dyn ChatModel>,
        tts: Arc<dyn TextToSpeech>,
        publisher: Arc<dyn AudioPublisher>,
    ) -> Self {
        Self {
            stt,
            llm,
            tts,
            publisher,
        }
    }

    /// Generate a reply to `message`, voice it and publish the audio.
    pub async fn respond_to_text(&self, message: &str) -> ProviderResult<PipelineResult> {
        let (reply, audio_url) = self.reply_and_publish(message).await?;
        Ok(PipelineResult {
            transcript: None,
            reply,
            audio_url,
        })
    }

    /// Transcribe `upload`, then continue as [`Self::respond_to_text`].
    pub async fn respond_to_audio(&self, upload: &AudioUpload) -> ProviderResult<PipelineResult> {
        let transcription = self.transcribe(upload).await?;

        let (reply, audio_url) = self.reply_and_publish(&transcription.text).await?;
        Ok(PipelineResult {
            transcript: Some(transcription.text),
            reply,
            audio_url,
        })
    }

    /// Synthesize `text` without generation or publishing.
    pub async fn speak(&self, text: &str) -> ProviderResult<SynthesizedAudio> {
        self.tts.synthesize(text).await
    }

    /// Transcribe `upload` without generation.
    ///
    /// A transcription with no text is an error: nothing usable came back.
    pub async fn transcribe(&self, upload: &AudioUpload) -> ProviderResult<Transcription> {
        let transcription = self.stt.transcribe(upload).await?;
        if transcription.text.is_empty() {
            return Err(ProviderError::new(
                "transcription",
                "No speech recognized in audio",
            ));
        }
        info!(chars = transcription.text.len(), "Audio transcribed");
        Ok(transcription)
    }

    async fn reply_and_publish(&self, message: &str) -> ProviderResult<(String, String)> {
        let reply = self.llm.reply(message).await?;
        info!(chars = reply.len(), "Reply generated");

        let audio = self.tts.synthesize(&reply).await?;
        let audio_url = self.publisher.publish(audio).await?;
        info!(%audio_url, "Reply audio published");

        Ok((reply, audio_url))
    }
}
