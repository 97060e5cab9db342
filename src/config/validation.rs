//! Configuration validation run after all sources are merged.

use crate::core::{SUPPORTED_STT_PROVIDERS, SUPPORTED_TTS_PROVIDERS};

use super::ServerConfig;

/// Validate the fully merged configuration.
pub(crate) fn validate(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_auth_required(config.auth_required, &config.api_tokens)?;
    validate_provider_name("STT", &config.stt_provider, SUPPORTED_STT_PROVIDERS)?;
    validate_provider_name("TTS", &config.tts_provider, SUPPORTED_TTS_PROVIDERS)?;
    validate_limits(config)?;
    validate_base_url("OPENAI_BASE_URL", &config.openai_base_url)?;
    validate_base_url("ELEVENLABS_BASE_URL", &config.elevenlabs_base_url)?;
    validate_base_url("TELEGRAM_API_URL", &config.telegram_api_url)?;
    if let Some(ref public_base_url) = config.public_base_url {
        validate_base_url("PUBLIC_BASE_URL", public_base_url)?;
    }
    validate_telegram(
        config.telegram_bot_token.as_deref(),
        config.telegram_chat_id.as_deref(),
    )?;
    Ok(())
}

/// Authentication cannot be required with nothing to authenticate against.
pub(crate) fn validate_auth_required(
    auth_required: bool,
    api_tokens: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    if auth_required && api_tokens.is_empty() {
        return Err(
            "AUTH_REQUIRED is enabled but no API_TOKENS are configured. \
             Set API_TOKENS (comma-separated) or AUTH_REQUIRED=false"
                .into(),
        );
    }
    Ok(())
}

pub(crate) fn validate_provider_name(
    kind: &str,
    name: &str,
    supported: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    let normalized = name.to_lowercase();
    if supported.contains(&normalized.as_str()) {
        return Ok(());
    }
    Err(format!(
        "Unsupported {kind} provider: {name}. Supported providers: {}",
        supported.join(", ")
    )
    .into())
}

/// Base URLs must be absolute `http(s)` URLs.
pub(crate) fn validate_base_url(name: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = url::Url::parse(value).map_err(|e| format!("Invalid {name} ({value:?}): {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!("Invalid {name} ({value:?}): unsupported scheme {scheme}").into()),
    }
}

fn validate_limits(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.provider_timeout_seconds == 0 {
        return Err("PROVIDER_TIMEOUT_SECONDS must be greater than 0".into());
    }
    if config.log_max_bytes == 0 {
        return Err("LOG_MAX_BYTES must be greater than 0".into());
    }
    if config.max_upload_bytes == 0 {
        return Err("MAX_UPLOAD_BYTES must be greater than 0".into());
    }
    if config.rate_limit_requests_per_second == 0 || config.rate_limit_burst_size == 0 {
        return Err(
            "RATE_LIMIT_REQUESTS_PER_SECOND and RATE_LIMIT_BURST_SIZE must be greater than 0"
                .into(),
        );
    }
    if let Some(temperature) = config.llm_temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(
                format!("LLM_TEMPERATURE must be between 0.0 and 2.0, got {temperature}").into(),
            );
        }
    }
    Ok(())
}

/// Telegram needs both the bot token and the chat id, or neither.
fn validate_telegram(
    bot_token: Option<&str>,
    chat_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    match (bot_token, chat_id) {
        (Some(_), None) => Err("TELEGRAM_BOT_TOKEN is set but TELEGRAM_CHAT_ID is missing".into()),
        (None, Some(_)) => Err("TELEGRAM_CHAT_ID is set but TELEGRAM_BOT_TOKEN is missing".into()),
        _ => Ok(()),
    }
}
