use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional so a file can override just the values it names;
/// everything else keeps the value loaded from the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 5000
///   public_base_url: "https://voice.example.com"
///
/// auth:
///   required: true
///   tokens:
///     - "client-a-token"
///     - "client-b-token"
///
/// providers:
///   openai:
///     api_key: "sk-..."
///   elevenlabs:
///     api_key: "xi-..."
///     voice_id: "21m00Tcm4TlvDq8ikWAM"
///
/// pipeline:
///   stt_provider: "openai"
///   tts_provider: "elevenlabs"
///   llm_model: "gpt-4o-mini"
///   timeout_seconds: 60
///
/// notifications:
///   telegram:
///     bot_token: "123:abc"
///     chat_id: "-100123"
///
/// logging:
///   dir: "logs"
///   max_bytes: 1000000
///   max_backups: 5
///
/// storage:
///   audio_dir: "audio"
///   max_files: 1000
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub auth: Option<AuthYaml>,
    pub providers: Option<ProvidersYaml>,
    pub pipeline: Option<PipelineYaml>,
    pub notifications: Option<NotificationsYaml>,
    pub logging: Option<LoggingYaml>,
    pub storage: Option<StorageYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Base URL clients use to reach this server (prefix of `audio_url`)
    pub public_base_url: Option<String>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Authentication configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    pub required: Option<bool>,
    /// Replaces the `API_TOKENS` list when present
    pub tokens: Option<Vec<String>>,
}

/// Provider credentials and endpoints from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersYaml {
    pub openai: Option<OpenAIYaml>,
    pub elevenlabs: Option<ElevenLabsYaml>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OpenAIYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub tts_model: Option<String>,
    pub tts_voice: Option<String>,
    pub tts_format: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ElevenLabsYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
}

/// Provider selection and generation settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PipelineYaml {
    pub stt_provider: Option<String>,
    pub tts_provider: Option<String>,
    pub stt_model: Option<String>,
    pub stt_language: Option<String>,
    pub llm_model: Option<String>,
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    /// Per-request timeout for every provider call
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NotificationsYaml {
    pub telegram: Option<TelegramYaml>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TelegramYaml {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_url: Option<String>,
}

/// Failure log configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingYaml {
    pub dir: Option<String>,
    pub max_bytes: Option<u64>,
    pub max_backups: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageYaml {
    pub audio_dir: Option<String>,
    pub max_files: Option<usize>,
    pub max_upload_bytes: Option<usize>,
}

/// Security configuration from YAML
///
/// # Example YAML structure
/// ```yaml
/// security:
///   cors_allowed_origins: "https://example.com,https://app.example.com"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    /// CORS allowed origins (comma-separated list or "*" for all)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: Option<u32>,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
