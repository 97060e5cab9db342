//! Overlay YAML values on top of the environment-derived configuration.

use std::path::PathBuf;

use super::env::load_from_env;
use super::yaml::YamlConfig;
use super::{ServerConfig, TlsConfig};

/// Assign `$target = value` for every `Some(value)` in `$source`.
macro_rules! override_with {
    ($target:expr, $source:expr) => {
        if let Some(value) = $source {
            $target = value;
        }
    };
}

/// Load the environment, then apply every value the YAML file sets.
pub(crate) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = load_from_env()?;
    if let Some(yaml) = yaml {
        apply_yaml(&mut config, yaml)?;
    }
    Ok(config)
}

fn apply_yaml(
    config: &mut ServerConfig,
    yaml: YamlConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(server) = yaml.server {
        override_with!(config.host, server.host);
        override_with!(config.port, server.port);
        if server.public_base_url.is_some() {
            config.public_base_url = server.public_base_url;
        }
        if let Some(tls) = server.tls {
            if tls.enabled == Some(false) {
                config.tls = None;
            } else {
                match (tls.cert_path, tls.key_path) {
                    (Some(cert_path), Some(key_path)) => {
                        config.tls = Some(TlsConfig {
                            cert_path: PathBuf::from(cert_path),
                            key_path: PathBuf::from(key_path),
                        });
                    }
                    (None, None) => {}
                    _ => {
                        return Err(
                            "server.tls requires both cert_path and key_path".into(),
                        );
                    }
                }
            }
        }
    }

    if let Some(auth) = yaml.auth {
        override_with!(config.auth_required, auth.required);
        if let Some(tokens) = auth.tokens {
            config.api_tokens = tokens
                .into_iter()
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
                .collect();
        }
    }

    if let Some(providers) = yaml.providers {
        if let Some(openai) = providers.openai {
            if openai.api_key.is_some() {
                config.openai_api_key = openai.api_key;
            }
            override_with!(config.openai_base_url, openai.base_url);
            override_with!(config.openai_tts_model, openai.tts_model);
            override_with!(config.openai_tts_voice, openai.tts_voice);
            override_with!(config.openai_tts_format, openai.tts_format);
        }
        if let Some(elevenlabs) = providers.elevenlabs {
            if elevenlabs.api_key.is_some() {
                config.elevenlabs_api_key = elevenlabs.api_key;
            }
            override_with!(config.elevenlabs_base_url, elevenlabs.base_url);
            override_with!(config.elevenlabs_voice_id, elevenlabs.voice_id);
            override_with!(config.elevenlabs_model_id, elevenlabs.model_id);
        }
    }

    if let Some(pipeline) = yaml.pipeline {
        override_with!(config.stt_provider, pipeline.stt_provider);
        override_with!(config.tts_provider, pipeline.tts_provider);
        override_with!(config.stt_model, pipeline.stt_model);
        if pipeline.stt_language.is_some() {
            config.stt_language = pipeline.stt_language;
        }
        override_with!(config.llm_model, pipeline.llm_model);
        if pipeline.system_prompt.is_some() {
            config.llm_system_prompt = pipeline.system_prompt;
        }
        if pipeline.temperature.is_some() {
            config.llm_temperature = pipeline.temperature;
        }
        override_with!(config.provider_timeout_seconds, pipeline.timeout_seconds);
    }

    if let Some(telegram) = yaml.notifications.and_then(|n| n.telegram) {
        if telegram.bot_token.is_some() {
            config.telegram_bot_token = telegram.bot_token;
        }
        if telegram.chat_id.is_some() {
            config.telegram_chat_id = telegram.chat_id;
        }
        override_with!(config.telegram_api_url, telegram.api_url);
    }

    if let Some(logging) = yaml.logging {
        override_with!(config.log_dir, logging.dir.map(PathBuf::from));
        override_with!(config.log_max_bytes, logging.max_bytes);
        override_with!(config.log_max_backups, logging.max_backups);
    }

    if let Some(storage) = yaml.storage {
        override_with!(config.audio_dir, storage.audio_dir.map(PathBuf::from));
        override_with!(config.audio_max_files, storage.max_files);
        override_with!(config.max_upload_bytes, storage.max_upload_bytes);
    }

    if let Some(security) = yaml.security {
        if security.cors_allowed_origins.is_some() {
            config.cors_allowed_origins = security.cors_allowed_origins;
        }
        override_with!(
            config.rate_limit_requests_per_second,
            security.rate_limit_requests_per_second
        );
        override_with!(config.rate_limit_burst_size, security.rate_limit_burst_size);
    }

    Ok(())
}
