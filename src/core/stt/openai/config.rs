//! Configuration types for the OpenAI transcription API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::OPENAI_API_BASE;

/// Path of the transcription endpoint relative to the API base URL
pub const OPENAI_TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";

// =============================================================================
// OpenAI STT Models
// =============================================================================

/// Supported OpenAI STT models.
///
/// - `whisper-1`: Original Whisper model, good balance of speed and accuracy
/// - `gpt-4o-transcribe`: Enhanced transcription with GPT-4o intelligence
/// - `gpt-4o-mini-transcribe`: Faster, cost-effective transcription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpenAISTTModel {
    #[default]
    #[serde(rename = "whisper-1")]
    Whisper1,
    #[serde(rename = "gpt-4o-transcribe")]
    Gpt4oTranscribe,
    #[serde(rename = "gpt-4o-mini-transcribe")]
    Gpt4oMiniTranscribe,
}

impl OpenAISTTModel {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whisper1 => "whisper-1",
            Self::Gpt4oTranscribe => "gpt-4o-transcribe",
            Self::Gpt4oMiniTranscribe => "gpt-4o-mini-transcribe",
        }
    }

    /// Parse from string, with fallback to default.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "whisper-1" | "whisper1" | "whisper" => Self::Whisper1,
            "gpt-4o-transcribe" | "gpt4o-transcribe" => Self::Gpt4oTranscribe,
            "gpt-4o-mini-transcribe" | "gpt4o-mini-transcribe" => Self::Gpt4oMiniTranscribe,
            _ => Self::default(),
        }
    }
}

impl std::fmt::Display for OpenAISTTModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// OpenAI transcription adapter configuration.
#[derive(Debug, Clone)]
pub struct OpenAISTTConfig {
    /// API key; a missing key fails each call rather than construction
    pub api_key: Option<String>,
    /// API base URL (overridable for proxies and tests)
    pub base_url: String,
    pub model: OpenAISTTModel,
    /// Optional ISO-639-1 language hint
    pub language: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OpenAISTTConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENAI_API_BASE.to_string(),
            model: OpenAISTTModel::default(),
            language: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAISTTConfig {
    /// Full URL of the transcription endpoint.
    pub fn api_url(&self) -> String {
        crate::core::provider::endpoint(&self.base_url, OPENAI_TRANSCRIPTIONS_PATH)
    }
}
