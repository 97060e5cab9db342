//! Response types for the OpenAI transcription API.
//!
//! API Reference: https://platform.openai.com/docs/api-reference/audio/createTranscription

use serde::{Deserialize, Serialize};

/// Transcription response (`json` format).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionResponse {
    /// The transcribed text.
    pub text: String,

    /// Language of the audio, only present for `verbose_json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
