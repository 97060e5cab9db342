//! Environment variable loading.
//!
//! `.env` values are already present in the process environment by the time
//! these functions run (`dotenvy` is called once in `main`).

use std::path::PathBuf;
use std::str::FromStr;

use super::{ServerConfig, TlsConfig};

/// Read a variable, treating unset and empty the same.
pub(crate) fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Read and parse a variable.
pub(crate) fn env_parse<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {name} ({raw:?}): {e}")),
        None => Ok(None),
    }
}

/// Read a boolean variable (`true/false`, `1/0`, `yes/no`, `on/off`).
pub(crate) fn env_bool(name: &str) -> Result<Option<bool>, String> {
    match env_string(name) {
        Some(raw) => parse_bool(&raw)
            .map(Some)
            .ok_or_else(|| format!("Invalid value for {name} ({raw:?}): expected a boolean")),
        None => Ok(None),
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated token list, dropping blank entries.
pub(crate) fn parse_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a configuration from defaults overlaid with environment variables.
pub(crate) fn load_from_env() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = ServerConfig::default();

    if let Some(host) = env_string("HOST") {
        config.host = host;
    }
    if let Some(port) = env_parse("PORT")? {
        config.port = port;
    }
    config.tls = match (env_string("TLS_CERT_PATH"), env_string("TLS_KEY_PATH")) {
        (Some(cert_path), Some(key_path)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert_path),
            key_path: PathBuf::from(key_path),
        }),
        (None, None) => None,
        _ => {
            return Err("TLS_CERT_PATH and TLS_KEY_PATH must be set together".into());
        }
    };
    config.public_base_url = env_string("PUBLIC_BASE_URL");

    if let Some(tokens) = env_string("API_TOKENS") {
        config.api_tokens = parse_token_list(&tokens);
    }
    if let Some(required) = env_bool("AUTH_REQUIRED")? {
        config.auth_required = required;
    }

    config.openai_api_key = env_string("OPENAI_API_KEY");
    if let Some(base_url) = env_string("OPENAI_BASE_URL") {
        config.openai_base_url = base_url;
    }
    if let Some(model) = env_string("OPENAI_TTS_MODEL") {
        config.openai_tts_model = model;
    }
    if let Some(voice) = env_string("OPENAI_TTS_VOICE") {
        config.openai_tts_voice = voice;
    }
    if let Some(format) = env_string("OPENAI_TTS_FORMAT") {
        config.openai_tts_format = format;
    }

    config.elevenlabs_api_key = env_string("ELEVENLABS_API_KEY");
    if let Some(base_url) = env_string("ELEVENLABS_BASE_URL") {
        config.elevenlabs_base_url = base_url;
    }
    if let Some(voice_id) = env_string("ELEVENLABS_VOICE_ID") {
        config.elevenlabs_voice_id = voice_id;
    }
    if let Some(model_id) = env_string("ELEVENLABS_MODEL_ID") {
        config.elevenlabs_model_id = model_id;
    }

    if let Some(provider) = env_string("STT_PROVIDER") {
        config.stt_provider = provider;
    }
    if let Some(provider) = env_string("TTS_PROVIDER") {
        config.tts_provider = provider;
    }
    if let Some(model) = env_string("STT_MODEL") {
        config.stt_model = model;
    }
    config.stt_language = env_string("STT_LANGUAGE");
    if let Some(model) = env_string("LLM_MODEL") {
        config.llm_model = model;
    }
    config.llm_system_prompt = env_string("LLM_SYSTEM_PROMPT");
    config.llm_temperature = env_parse("LLM_TEMPERATURE")?;
    if let Some(seconds) = env_parse("PROVIDER_TIMEOUT_SECONDS")? {
        config.provider_timeout_seconds = seconds;
    }

    config.telegram_bot_token = env_string("TELEGRAM_BOT_TOKEN");
    config.telegram_chat_id = env_string("TELEGRAM_CHAT_ID");
    if let Some(api_url) = env_string("TELEGRAM_API_URL") {
        config.telegram_api_url = api_url;
    }

    if let Some(dir) = env_string("LOG_DIR") {
        config.log_dir = PathBuf::from(dir);
    }
    if let Some(max_bytes) = env_parse("LOG_MAX_BYTES")? {
        config.log_max_bytes = max_bytes;
    }
    if let Some(max_backups) = env_parse("LOG_MAX_BACKUPS")? {
        config.log_max_backups = max_backups;
    }
    if let Some(dir) = env_string("AUDIO_DIR") {
        config.audio_dir = PathBuf::from(dir);
    }
    if let Some(max_files) = env_parse("AUDIO_MAX_FILES")? {
        config.audio_max_files = max_files;
    }
    if let Some(max_upload_bytes) = env_parse("MAX_UPLOAD_BYTES")? {
        config.max_upload_bytes = max_upload_bytes;
    }

    config.cors_allowed_origins = env_string("CORS_ALLOWED_ORIGINS");
    if let Some(rps) = env_parse("RATE_LIMIT_REQUESTS_PER_SECOND")? {
        config.rate_limit_requests_per_second = rps;
    }
    if let Some(burst) = env_parse("RATE_LIMIT_BURST_SIZE")? {
        config.rate_limit_burst_size = burst;
    }

    Ok(config)
}
