//! ElevenLabs Speech-to-Text (Scribe) API integration.
//!
//! - API Endpoint: `POST https://api.elevenlabs.io/v1/speech-to-text`
//! - Authentication: `xi-api-key` header
//! - Request: multipart with `model_id` and `file`

mod client;
mod config;

pub use client::ElevenLabsSTT;
pub use config::{ELEVENLABS_DEFAULT_STT_MODEL, ELEVENLABS_STT_PATH, ElevenLabsSTTConfig};
