use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::auth::CredentialStore;
use crate::config::ServerConfig;
use crate::core::{
    LocalAudioStore, Stage, VoicePipeline, create_chat_model, create_stt_provider,
    create_tts_provider,
};
use crate::errors::AppError;
use crate::notify::FailureNotifier;

/// Application state shared by every request.
pub struct AppState {
    pub config: ServerConfig,
    pub credentials: CredentialStore,
    pub notifier: FailureNotifier,
    pub pipeline: VoicePipeline,
}

impl AppState {
    /// Build the production state: file failure log, optional Telegram relay
    /// and the configured provider adapters.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        let notifier = FailureNotifier::from_config(&config)
            .with_context(|| format!("Failed to open failure log in {}", config.log_dir.display()))?;

        let stt = create_stt_provider(&config.stt_provider, &config)?;
        let llm = create_chat_model(&config)?;
        let tts = create_tts_provider(&config.tts_provider, &config)?;

        tokio::fs::create_dir_all(&config.audio_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create audio directory {}",
                    config.audio_dir.display()
                )
            })?;
        let publisher = Arc::new(
            LocalAudioStore::new(config.audio_dir.clone(), config.public_base_url())
                .with_max_files(config.audio_max_files),
        );

        info!(
            stt_provider = %config.stt_provider,
            tts_provider = %config.tts_provider,
            llm_model = %config.llm_model,
            telegram = notifier.has_relay(),
            "Voice pipeline configured"
        );

        let pipeline = VoicePipeline::new(stt, llm, tts, publisher);
        Ok(Self::from_parts(config, notifier, pipeline))
    }

    /// Assemble state from already constructed services.
    pub fn from_parts(
        config: ServerConfig,
        notifier: FailureNotifier,
        pipeline: VoicePipeline,
    ) -> Arc<Self> {
        let credentials = CredentialStore::new(config.api_tokens.iter().cloned());
        Arc::new(Self {
            config,
            credentials,
            notifier,
            pipeline,
        })
    }

    /// Move a request on `route` to the `Failed` stage.
    ///
    /// Every failure is reported to the notifier exactly once, here.
    pub fn reject(&self, route: &str, error: AppError) -> AppError {
        Stage::Failed.trace(route);
        self.notifier.notify(format!("{route}: {error}"));
        error
    }
}
