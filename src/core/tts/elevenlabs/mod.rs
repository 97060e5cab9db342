//! ElevenLabs text-to-speech integration.
//!
//! - API Endpoint: `POST https://api.elevenlabs.io/v1/text-to-speech/{voice_id}`
//! - Authentication: `xi-api-key` header

mod config;
mod provider;

pub use config::{
    ELEVENLABS_DEFAULT_OUTPUT_FORMAT, ELEVENLABS_DEFAULT_TTS_MODEL, ELEVENLABS_DEFAULT_VOICE_ID,
    ElevenLabsTTSConfig,
};
pub use provider::ElevenLabsTTS;
