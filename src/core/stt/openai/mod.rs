//! OpenAI Speech-to-Text (Whisper) API integration.
//!
//! Unlike streaming providers, the transcription API is a REST batch call: the
//! whole uploaded file goes out in one multipart request and the transcript
//! comes back in the response body.
//!
//! - [`config`]: Configuration types (`OpenAISTTConfig`, `OpenAISTTModel`)
//! - [`messages`]: Response types for the transcription API
//! - [`client`]: The `OpenAISTT` adapter
//!
//! # API Reference
//!
//! - API Endpoint: `POST https://api.openai.com/v1/audio/transcriptions`
//! - Max file size: 25MB
//! - Supported formats: mp3, mp4, mpeg, mpga, m4a, wav, webm

mod client;
mod config;
mod messages;

pub use client::OpenAISTT;
pub use config::{OPENAI_TRANSCRIPTIONS_PATH, OpenAISTTConfig, OpenAISTTModel};
pub use messages::TranscriptionResponse;
