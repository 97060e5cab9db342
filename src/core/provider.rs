//! Provider capabilities shared by every adapter.
//!
//! Each external service is reached through one single-method trait so the
//! request pipeline can be driven by real HTTP adapters in production and by
//! deterministic fakes in tests. Adapters make exactly one outbound call per
//! invocation and never retry.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde_json::Value;

/// Maximum number of characters of a provider error body carried into a
/// [`ProviderError`] cause.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Failure of a single outbound provider call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{provider} error: {cause}")]
pub struct ProviderError {
    /// Name of the provider that failed (e.g. `openai`, `elevenlabs`)
    pub provider: String,
    /// Human-readable failure cause
    pub cause: String,
}

impl ProviderError {
    pub fn new(provider: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            cause: cause.into(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Audio file received from a client.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Bytes,
    pub filename: String,
    pub mime_type: String,
}

/// Normalized transcription plus the provider's native response body.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    pub raw: Value,
}

/// Encoded audio returned by a synthesis provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub bytes: Bytes,
    pub content_type: String,
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, upload: &AudioUpload) -> ProviderResult<Transcription>;
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn reply(&self, message: &str) -> ProviderResult<String>;
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str) -> ProviderResult<SynthesizedAudio>;
}

/// Makes synthesized audio reachable by clients and returns its URL.
#[async_trait]
pub trait AudioPublisher: Send + Sync {
    async fn publish(&self, audio: SynthesizedAudio) -> ProviderResult<String>;
}

/// Build the HTTP client used by an adapter.
///
/// The client is reused across requests (connection pooling) and carries the
/// configured request timeout so no provider call waits unbounded.
pub(crate) fn build_http_client(provider: &str, timeout: Duration) -> ProviderResult<Client> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| ProviderError::new(provider, format!("Failed to create HTTP client: {e}")))
}

/// Join a configured base URL and an API path.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Return the API key or fail the call when it is not configured.
pub(crate) fn require_api_key<'a>(provider: &str, api_key: Option<&'a str>) -> ProviderResult<&'a str> {
    api_key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ProviderError::new(provider, "API key not configured in server environment"))
}

/// Map a transport error to a [`ProviderError`] without leaking the request URL.
pub(crate) fn transport_error(provider: &str, error: reqwest::Error) -> ProviderError {
    let error = error.without_url();
    if error.is_timeout() {
        ProviderError::new(provider, format!("Request timed out: {error}"))
    } else {
        ProviderError::new(provider, format!("Request failed: {error}"))
    }
}

/// Pass successful responses through; turn any other status into a
/// [`ProviderError`] carrying the provider's own error message when it has one.
pub(crate) async fn ensure_success(provider: &str, response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::new(
        provider,
        format!("API error ({status}): {}", describe_error_body(&body)),
    ))
}

/// Read a successful JSON response body.
pub(crate) async fn read_json(provider: &str, response: Response) -> ProviderResult<Value> {
    let response = ensure_success(provider, response).await?;
    response
        .json::<Value>()
        .await
        .map_err(|e| ProviderError::new(provider, format!("Failed to parse response: {e}")))
}

/// Extract the most useful message from a provider error body.
///
/// Understands the OpenAI shape (`{"error": {"message": ...}}`) and the
/// ElevenLabs shapes (`{"detail": {"message": ...}}` / `{"detail": "..."}`),
/// falling back to the raw body.
pub(crate) fn describe_error_body(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.pointer("/detail/message"))
            .or_else(|| value.get("detail").filter(|d| d.is_string()))
            .or_else(|| value.get("error").filter(|e| e.is_string()))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::new("openai", "API error (500): boom");
        assert_eq!(err.to_string(), "openai error: API error (500): boom");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("https://api.openai.com/", "/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:9000", "/v1/audio/speech"),
            "http://127.0.0.1:9000/v1/audio/speech"
        );
    }

    #[test]
    fn test_require_api_key() {
        assert_eq!(require_api_key("openai", Some("sk-1")).unwrap(), "sk-1");
        assert!(require_api_key("openai", Some("")).is_err());
        let err = require_api_key("elevenlabs", None).unwrap_err();
        assert_eq!(err.provider, "elevenlabs");
    }

    #[test]
    fn test_describe_error_body_openai_shape() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error"}}"#;
        assert_eq!(describe_error_body(body), "Invalid API key");
    }

    #[test]
    fn test_describe_error_body_elevenlabs_shapes() {
        let nested = r#"{"detail": {"status": "quota_exceeded", "message": "Quota exceeded"}}"#;
        assert_eq!(describe_error_body(nested), "Quota exceeded");

        let flat = r#"{"detail": "Not authenticated"}"#;
        assert_eq!(describe_error_body(flat), "Not authenticated");
    }

    #[test]
    fn test_describe_error_body_fallbacks() {
        assert_eq!(describe_error_body("  upstream down \n"), "upstream down");
        assert_eq!(describe_error_body(""), "empty response body");

        let long = "x".repeat(2 * MAX_ERROR_BODY_CHARS);
        assert_eq!(describe_error_body(&long).len(), MAX_ERROR_BODY_CHARS);
    }
}
