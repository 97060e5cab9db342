use std::time::Duration;

use crate::core::ELEVENLABS_API_BASE;

/// Path of the speech-to-text endpoint relative to the API base URL
pub const ELEVENLABS_STT_PATH: &str = "/v1/speech-to-text";

/// Default ElevenLabs transcription model
pub const ELEVENLABS_DEFAULT_STT_MODEL: &str = "scribe_v1";

/// ElevenLabs Scribe adapter configuration.
#[derive(Debug, Clone)]
pub struct ElevenLabsSTTConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_id: String,
    /// Optional ISO-639 language code; detected automatically when absent
    pub language_code: Option<String>,
    pub timeout: Duration,
}

impl Default for ElevenLabsSTTConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: ELEVENLABS_API_BASE.to_string(),
            model_id: ELEVENLABS_DEFAULT_STT_MODEL.to_string(),
            language_code: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ElevenLabsSTTConfig {
    pub fn api_url(&self) -> String {
        crate::core::provider::endpoint(&self.base_url, ELEVENLABS_STT_PATH)
    }
}
