//! OpenAI TTS provider module.
//!
//! # Supported Models
//!
//! - `tts-1` - Standard quality, lower latency
//! - `tts-1-hd` - High definition quality, higher latency
//! - `gpt-4o-mini-tts` - Latest model with improved quality

mod config;
mod provider;

pub use config::{
    AudioOutputFormat, OPENAI_SPEECH_PATH, OpenAITTSConfig, OpenAITTSModel, OpenAIVoice,
};
pub use provider::OpenAITTS;
