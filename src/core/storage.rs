//! Local storage for synthesized audio.
//!
//! Files are written under the configured audio directory with random names
//! and served read-only under `/audio/`, which makes the returned URL usable
//! by clients as soon as `publish` returns. When a file cap is set, the
//! oldest files (by modification time) are deleted after each write until the
//! directory holds at most that many.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use super::provider::{AudioPublisher, ProviderError, ProviderResult, SynthesizedAudio};

const PROVIDER: &str = "storage";

/// URL path prefix under which stored audio is served
pub const AUDIO_ROUTE_PREFIX: &str = "/audio";

/// Writes audio files to a local directory and returns their public URL.
#[derive(Debug, Clone)]
pub struct LocalAudioStore {
    dir: PathBuf,
    public_base_url: String,
    max_files: usize,
}

impl LocalAudioStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_files: 0,
        }
    }

    /// Keep at most `max_files` stored files; 0 disables pruning.
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}{AUDIO_ROUTE_PREFIX}/{file_name}", self.public_base_url)
    }

    /// Delete the oldest files beyond the cap, never touching `keep`.
    async fn prune(&self, keep: &Path) -> std::io::Result<usize> {
        if self.max_files == 0 {
            return Ok(0);
        }

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path == keep {
                continue;
            }
            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                files.push((metadata.modified()?, path));
            }
        }

        // The kept file counts toward the cap.
        let excess = (files.len() + 1).saturating_sub(self.max_files);
        if excess == 0 {
            return Ok(0);
        }

        files.sort();
        let mut removed = 0;
        for (_, path) in files.into_iter().take(excess) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to prune stored audio"),
            }
        }
        Ok(removed)
    }
}

/// File extension for an audio MIME type.
fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/ogg" => "ogg",
        "audio/opus" => "opus",
        "audio/aac" => "aac",
        "audio/flac" => "flac",
        "audio/pcm" => "pcm",
        _ => "bin",
    }
}

#[async_trait]
impl AudioPublisher for LocalAudioStore {
    async fn publish(&self, audio: SynthesizedAudio) -> ProviderResult<String> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ProviderError::new(
                PROVIDER,
                format!("Failed to create {}: {e}", self.dir.display()),
            )
        })?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension_for(&audio.content_type));
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &audio.bytes).await.map_err(|e| {
            ProviderError::new(PROVIDER, format!("Failed to write {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), bytes = audio.bytes.len(), "Stored synthesized audio");

        match self.prune(&path).await {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "Pruned old stored audio"),
            Err(e) => warn!(dir = %self.dir.display(), error = %e, "Failed to prune audio directory"),
        }

        Ok(self.url_for(&file_name))
    }
}
