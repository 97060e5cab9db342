//! Configuration module for the voice relay server
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use voice_relay::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod merge;
mod validation;
mod yaml;

use crate::core::llm::openai::OPENAI_DEFAULT_CHAT_MODEL;
use crate::core::tts::elevenlabs::{ELEVENLABS_DEFAULT_TTS_MODEL, ELEVENLABS_DEFAULT_VOICE_ID};
use crate::core::{ELEVENLABS_API_BASE, OPENAI_API_BASE};

/// Default Telegram Bot API base URL
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains all configuration needed to run the relay, including:
/// - Server settings (host, port, TLS, public URL)
/// - Accepted API tokens
/// - Provider credentials, endpoints and model selection
/// - Failure notification (log files, Telegram)
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    /// Base URL clients use to reach this server; prefix of every `audio_url`.
    /// Defaults to `http(s)://localhost:<port>`.
    pub public_base_url: Option<String>,

    // Authentication
    /// Accepted `Authorization` tokens, loaded once at startup
    pub api_tokens: Vec<String>,
    pub auth_required: bool,

    // OpenAI (transcription, chat, optional synthesis)
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_tts_model: String,
    pub openai_tts_voice: String,
    /// `response_format` for OpenAI speech (mp3, opus, aac, flac, wav)
    pub openai_tts_format: String,

    // ElevenLabs (synthesis, optional transcription)
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_voice_id: String,
    pub elevenlabs_model_id: String,

    // Pipeline
    /// Transcription provider name (`openai` or `elevenlabs`)
    pub stt_provider: String,
    /// Synthesis provider name (`elevenlabs` or `openai`)
    pub tts_provider: String,
    pub stt_model: String,
    /// Optional language hint sent with every transcription
    pub stt_language: Option<String>,
    pub llm_model: String,
    pub llm_system_prompt: Option<String>,
    pub llm_temperature: Option<f32>,
    /// Request timeout applied to every provider call
    pub provider_timeout_seconds: u64,

    // Failure notification
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_url: String,
    /// Directory holding `errors.log` and its rotated backups
    pub log_dir: PathBuf,
    pub log_max_bytes: u64,
    pub log_max_backups: usize,

    // Storage
    /// Directory synthesized audio is written to and served from
    pub audio_dir: PathBuf,
    /// Stored audio files kept before the oldest are pruned (0 keeps all)
    pub audio_max_files: usize,
    /// Maximum accepted request body size (uploads included)
    pub max_upload_bytes: usize,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            tls: None,
            public_base_url: None,
            api_tokens: Vec::new(),
            auth_required: true,
            openai_api_key: None,
            openai_base_url: OPENAI_API_BASE.to_string(),
            openai_tts_model: "tts-1".to_string(),
            openai_tts_voice: "alloy".to_string(),
            openai_tts_format: "mp3".to_string(),
            elevenlabs_api_key: None,
            elevenlabs_base_url: ELEVENLABS_API_BASE.to_string(),
            elevenlabs_voice_id: ELEVENLABS_DEFAULT_VOICE_ID.to_string(),
            elevenlabs_model_id: ELEVENLABS_DEFAULT_TTS_MODEL.to_string(),
            stt_provider: "openai".to_string(),
            tts_provider: "elevenlabs".to_string(),
            stt_model: "whisper-1".to_string(),
            stt_language: None,
            llm_model: OPENAI_DEFAULT_CHAT_MODEL.to_string(),
            llm_system_prompt: None,
            llm_temperature: None,
            provider_timeout_seconds: 60,
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_url: TELEGRAM_API_BASE.to_string(),
            log_dir: PathBuf::from("logs"),
            log_max_bytes: 1_000_000,
            log_max_backups: 5,
            audio_dir: PathBuf::from("audio"),
            audio_max_files: 1000,
            max_upload_bytes: 25 * 1024 * 1024,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }
}

/// Implement Drop to zeroize all secret fields when ServerConfig is dropped.
/// This ensures sensitive data is cleared from memory immediately after use.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.openai_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.elevenlabs_api_key {
            key.zeroize();
        }
        if let Some(ref mut token) = self.telegram_bot_token {
            token.zeroize();
        }
        for token in &mut self.api_tokens {
            token.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// `.env` values must already be loaded (see `main.rs`). Performs
    /// validation on the result.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Base URL used to build public audio links, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match self.public_base_url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => {
                let scheme = if self.is_tls_enabled() { "https" } else { "http" };
                format!("{scheme}://localhost:{}", self.port)
            }
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }

    /// Check if failure messages should be relayed to Telegram
    pub fn has_telegram(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "HOST",
        "PORT",
        "TLS_CERT_PATH",
        "TLS_KEY_PATH",
        "PUBLIC_BASE_URL",
        "API_TOKENS",
        "AUTH_REQUIRED",
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "ELEVENLABS_API_KEY",
        "ELEVENLABS_VOICE_ID",
        "STT_PROVIDER",
        "TTS_PROVIDER",
        "LLM_MODEL",
        "LLM_TEMPERATURE",
        "PROVIDER_TIMEOUT_SECONDS",
        "TELEGRAM_BOT_TOKEN",
        "TELEGRAM_CHAT_ID",
        "LOG_DIR",
        "LOG_MAX_BYTES",
        "AUDIO_DIR",
        "AUDIO_MAX_FILES",
        "OPENAI_TTS_FORMAT",
        "RATE_LIMIT_REQUESTS_PER_SECOND",
    ];

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            for name in ENV_VARS {
                env::remove_var(name);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:5000");
        assert!(config.auth_required);
        assert_eq!(config.stt_provider, "openai");
        assert_eq!(config.tts_provider, "elevenlabs");
        assert_eq!(config.elevenlabs_voice_id, "21m00Tcm4TlvDq8ikWAM");
        assert_eq!(config.log_max_bytes, 1_000_000);
        assert_eq!(config.log_max_backups, 5);
        assert_eq!(config.audio_max_files, 1000);
        assert_eq!(config.openai_tts_format, "mp3");
        assert_eq!(config.provider_timeout(), Duration::from_secs(60));
        assert!(!config.has_telegram());
    }

    #[test]
    fn test_public_base_url() {
        let mut config = ServerConfig::default();
        assert_eq!(config.public_base_url(), "http://localhost:5000");

        config.tls = Some(TlsConfig {
            cert_path: PathBuf::from("cert.pem"),
            key_path: PathBuf::from("key.pem"),
        });
        assert_eq!(config.public_base_url(), "https://localhost:5000");

        config.public_base_url = Some("https://voice.example.com/".to_string());
        assert_eq!(config.public_base_url(), "https://voice.example.com");
    }

    #[test]
    #[serial]
    fn test_from_env() {
        cleanup_env_vars();
        unsafe {
            env::set_var("PORT", "8081");
            env::set_var("API_TOKENS", "alpha,beta,");
            env::set_var("OPENAI_API_KEY", "sk-env");
            env::set_var("TTS_PROVIDER", "openai");
            env::set_var("LLM_TEMPERATURE", "0.7");
            env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
            env::set_var("TELEGRAM_CHAT_ID", "-100");
            env::set_var("AUDIO_MAX_FILES", "50");
            env::set_var("OPENAI_TTS_FORMAT", "opus");
        }

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.api_tokens, vec!["alpha", "beta"]);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.tts_provider, "openai");
        assert_eq!(config.llm_temperature, Some(0.7));
        assert!(config.has_telegram());
        assert_eq!(config.audio_max_files, 50);
        assert_eq!(config.openai_tts_format, "opus");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_tokens_when_auth_required() {
        cleanup_env_vars();

        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("API_TOKENS"));

        unsafe {
            env::set_var("AUTH_REQUIRED", "false");
        }
        assert!(ServerConfig::from_env().is_ok());

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        cleanup_env_vars();
        unsafe {
            env::set_var("AUTH_REQUIRED", "false");
            env::set_var("PORT", "not-a-port");
        }

        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("Invalid value for PORT"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_unknown_provider() {
        cleanup_env_vars();
        unsafe {
            env::set_var("AUTH_REQUIRED", "false");
            env::set_var("STT_PROVIDER", "deepgram");
        }

        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("Unsupported STT provider"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_only() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
server:
  host: "127.0.0.1"
  port: 8080

auth:
  tokens: ["yaml-token"]

providers:
  openai:
    api_key: "yaml-openai-key"
  elevenlabs:
    api_key: "yaml-el-key"

logging:
  dir: "/tmp/voice-relay-logs"
"#;

        fs::write(&config_path, yaml_content).unwrap();

        let config = ServerConfig::from_file(&config_path).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_tokens, vec!["yaml-token"]);
        assert_eq!(config.openai_api_key, Some("yaml-openai-key".to_string()));
        assert_eq!(config.elevenlabs_api_key, Some("yaml-el-key".to_string()));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/voice-relay-logs"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
server:
  host: "127.0.0.1"

providers:
  openai:
    api_key: "yaml-key"
"#;

        fs::write(&config_path, yaml_content).unwrap();

        unsafe {
            env::set_var("HOST", "0.0.0.0");
            env::set_var("PORT", "7000");
            env::set_var("API_TOKENS", "env-token");
            env::set_var("OPENAI_API_KEY", "env-key");
        }

        let config = ServerConfig::from_file(&config_path).unwrap();

        // YAML overrides ENV
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.openai_api_key, Some("yaml-key".to_string()));
        // ENV values survive where YAML is silent
        assert_eq!(config.port, 7000);
        assert_eq!(config.api_tokens, vec!["env-token"]);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();

        let config_path = PathBuf::from("/nonexistent/config.yaml");
        let result = ServerConfig::from_file(&config_path);

        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );

        cleanup_env_vars();
    }
}
