pub mod llm;
pub mod pipeline;
pub mod provider;
pub mod storage;
pub mod stt;
pub mod tts;

/// Default OpenAI API base URL
pub const OPENAI_API_BASE: &str = "https://api.openai.com";

/// Default ElevenLabs API base URL
pub const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io";

// Re-export commonly used types for convenience
pub use provider::{
    AudioPublisher, AudioUpload, ChatModel, ProviderError, ProviderResult, SpeechToText,
    SynthesizedAudio, TextToSpeech, Transcription,
};

pub use pipeline::{PipelineResult, Stage, VoicePipeline};
pub use storage::LocalAudioStore;

pub use llm::create_chat_model;
pub use stt::{SUPPORTED_STT_PROVIDERS, create_stt_provider};
pub use tts::{SUPPORTED_TTS_PROVIDERS, create_tts_provider};
