use std::time::Duration;

use crate::core::ELEVENLABS_API_BASE;

/// Default voice ("Rachel")
pub const ELEVENLABS_DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Default synthesis model
pub const ELEVENLABS_DEFAULT_TTS_MODEL: &str = "eleven_multilingual_v2";

/// Default encoding requested from the API
pub const ELEVENLABS_DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";

/// ElevenLabs synthesis adapter configuration.
#[derive(Debug, Clone)]
pub struct ElevenLabsTTSConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    /// `<codec>_<sample_rate>[_<bitrate>]`, e.g. `mp3_44100_128`
    pub output_format: String,
    pub timeout: Duration,
}

impl Default for ElevenLabsTTSConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: ELEVENLABS_API_BASE.to_string(),
            voice_id: ELEVENLABS_DEFAULT_VOICE_ID.to_string(),
            model_id: ELEVENLABS_DEFAULT_TTS_MODEL.to_string(),
            output_format: ELEVENLABS_DEFAULT_OUTPUT_FORMAT.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ElevenLabsTTSConfig {
    /// Full URL of the text-to-speech endpoint for the configured voice.
    pub fn api_url(&self) -> String {
        crate::core::provider::endpoint(
            &self.base_url,
            &format!("/v1/text-to-speech/{}", self.voice_id),
        )
    }

    /// MIME type matching the configured output format.
    pub fn mime_type(&self) -> &'static str {
        match self.output_format.split('_').next().unwrap_or_default() {
            "pcm" => "audio/pcm",
            "ulaw" => "audio/basic",
            "opus" => "audio/opus",
            _ => "audio/mpeg",
        }
    }
}
