//! Shared test fixtures
//!
//! - Deterministic provider fakes that count their calls
//! - Chat relays that capture or reject notifications
//! - Generated WAV audio and multipart bodies
//! - [`TestApp`]: the full router over fakes and an in-memory failure log

#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::util::ServiceExt;

use voice_relay::notify::{ChatRelay, MemoryFailureLog, NotifyError};
use voice_relay::{
    AudioPublisher, AudioUpload, ChatModel, FailureNotifier, ProviderError, ProviderResult,
    ServerConfig, SpeechToText, SynthesizedAudio, TextToSpeech, Transcription, VoicePipeline,
    routes, state::AppState,
};

pub const TEST_TOKEN: &str = "test-token-1";
pub const FAKE_TRANSCRIPT: &str = "hello there";
pub const FAKE_REPLY: &str = "hi there";
pub const FAKE_AUDIO: &[u8] = b"ID3\x04\x00fake-mp3-frames";
pub const FAKE_AUDIO_URL: &str = "http://x/a.mp3";

// =============================================================================
// Provider fakes
// =============================================================================

#[derive(Default)]
pub struct FakeStt {
    pub calls: AtomicUsize,
}

#[async_trait]
impl SpeechToText for FakeStt {
    async fn transcribe(&self, upload: &AudioUpload) -> ProviderResult<Transcription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Transcription {
            text: FAKE_TRANSCRIPT.to_string(),
            raw: json!({ "text": FAKE_TRANSCRIPT, "filename": upload.filename }),
        })
    }
}

#[derive(Default)]
pub struct FakeChat {
    pub calls: AtomicUsize,
    pub last_message: parking_lot::Mutex<Option<String>>,
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn reply(&self, message: &str) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock() = Some(message.to_string());
        Ok(FAKE_REPLY.to_string())
    }
}

#[derive(Default)]
pub struct FakeTts {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TextToSpeech for FakeTts {
    async fn synthesize(&self, _text: &str) -> ProviderResult<SynthesizedAudio> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SynthesizedAudio {
            bytes: Bytes::from_static(FAKE_AUDIO),
            content_type: "audio/mpeg".to_string(),
        })
    }
}

pub struct FixedPublisher;

#[async_trait]
impl AudioPublisher for FixedPublisher {
    async fn publish(&self, _audio: SynthesizedAudio) -> ProviderResult<String> {
        Ok(FAKE_AUDIO_URL.to_string())
    }
}

/// Chat model whose upstream always answers 500.
pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn reply(&self, _message: &str) -> ProviderResult<String> {
        Err(ProviderError::new(
            "openai",
            "API error (500 Internal Server Error): upstream down",
        ))
    }
}

/// Speech-to-text that hears nothing.
pub struct SilentStt;

#[async_trait]
impl SpeechToText for SilentStt {
    async fn transcribe(&self, _upload: &AudioUpload) -> ProviderResult<Transcription> {
        Ok(Transcription {
            text: String::new(),
            raw: json!({ "text": "" }),
        })
    }
}

// =============================================================================
// Chat relays
// =============================================================================

pub struct CapturingRelay(pub mpsc::UnboundedSender<String>);

#[async_trait]
impl ChatRelay for CapturingRelay {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let _ = self.0.send(text.to_string());
        Ok(())
    }
}

pub struct FailingRelay;

#[async_trait]
impl ChatRelay for FailingRelay {
    async fn send(&self, _text: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Relay("Telegram API returned 502 Bad Gateway".to_string()))
    }
}

// =============================================================================
// Audio and request bodies
// =============================================================================

pub const SAMPLE_RATE: u32 = 16000;

/// 16-bit mono PCM sine tone wrapped in a WAV header.
pub fn generate_wav(duration_samples: usize, frequency: f32) -> Vec<u8> {
    let angular_freq = 2.0 * PI * frequency / SAMPLE_RATE as f32;
    let data: Vec<u8> = (0..duration_samples)
        .map(|i| ((angular_freq * i as f32).sin() * 0.5 * i16::MAX as f32) as i16)
        .flat_map(i16::to_le_bytes)
        .collect();

    let mut wav = Vec::with_capacity(44 + data.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data.len() as u32).to_le_bytes());
    wav.extend_from_slice(&data);
    wav
}

pub const BOUNDARY: &str = "voice-relay-test-boundary";

/// One part of a multipart/form-data body.
pub enum FormPart<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, token: Option<&str>, parts: &[FormPart<'_>]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

pub fn json_request(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    raw_json_request(uri, token, body.to_string())
}

pub fn raw_json_request(uri: &str, token: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(body.into()).unwrap()
}

// =============================================================================
// Application harness
// =============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Router over provider fakes with an in-memory failure log.
pub struct TestApp {
    pub router: Router,
    pub log: Arc<MemoryFailureLog>,
    pub stt: Arc<FakeStt>,
    pub llm: Arc<FakeChat>,
    pub tts: Arc<FakeTts>,
    pub audio_dir: tempfile::TempDir,
}

pub struct TestAppBuilder {
    auth_required: bool,
    max_upload_bytes: Option<usize>,
    llm: Option<Arc<dyn ChatModel>>,
    stt: Option<Arc<dyn SpeechToText>>,
    relay: Option<Arc<dyn ChatRelay>>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            auth_required: true,
            max_upload_bytes: None,
            llm: None,
            stt: None,
            relay: None,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub fn provider_calls(&self) -> usize {
        self.stt.calls.load(Ordering::SeqCst)
            + self.llm.calls.load(Ordering::SeqCst)
            + self.tts.calls.load(Ordering::SeqCst)
    }

    pub fn audio_path(&self) -> PathBuf {
        self.audio_dir.path().to_path_buf()
    }
}

impl TestAppBuilder {
    pub fn auth_required(mut self, required: bool) -> Self {
        self.auth_required = required;
        self
    }

    pub fn max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = Some(limit);
        self
    }

    pub fn chat_model(mut self, llm: Arc<dyn ChatModel>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn speech_to_text(mut self, stt: Arc<dyn SpeechToText>) -> Self {
        self.stt = Some(stt);
        self
    }

    pub fn relay(mut self, relay: Arc<dyn ChatRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    pub fn build(self) -> TestApp {
        let audio_dir = tempfile::TempDir::new().unwrap();

        let mut config = ServerConfig::default();
        config.api_tokens = vec![TEST_TOKEN.to_string(), "test-token-2".to_string()];
        config.auth_required = self.auth_required;
        config.audio_dir = audio_dir.path().to_path_buf();
        if let Some(limit) = self.max_upload_bytes {
            config.max_upload_bytes = limit;
        }

        let log = Arc::new(MemoryFailureLog::new());
        let notifier = FailureNotifier::new(log.clone(), self.relay);

        let stt = Arc::new(FakeStt::default());
        let llm = Arc::new(FakeChat::default());
        let tts = Arc::new(FakeTts::default());
        let pipeline = VoicePipeline::new(
            self.stt.unwrap_or_else(|| stt.clone() as Arc<dyn SpeechToText>),
            self.llm.unwrap_or_else(|| llm.clone() as Arc<dyn ChatModel>),
            tts.clone(),
            Arc::new(FixedPublisher),
        );

        let state = AppState::from_parts(config, notifier, pipeline);
        TestApp {
            router: routes::create_router(state),
            log,
            stt,
            llm,
            tts,
            audio_dir,
        }
    }
}
