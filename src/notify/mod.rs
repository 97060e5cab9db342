//! Failure notification: durable log plus best-effort chat relay.
//!
//! [`FailureNotifier::notify`] appends one [`FailureRecord`] to the failure
//! log before returning, then hands the message to the chat relay on a
//! detached task. Neither sink can fail the caller: log errors are reported
//! through `tracing`, relay errors are reported through `tracing` and written
//! back to the log as a `warning` record.

mod sink;
mod telegram;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{error, warn};

pub use sink::{FileFailureLog, MemoryFailureLog};
pub use telegram::{NOTIFICATION_TIMEOUT, TelegramRelay};

use crate::config::ServerConfig;

/// Prefix added to every relayed message
pub const ALERT_PREFIX: &str = "🚨 ";

/// Name of the active failure log file inside the log directory
pub const FAILURE_LOG_FILE: &str = "errors.log";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failure log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode failure record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Chat relay failed: {0}")]
    Relay(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One append-only line of the failure log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub severity: Severity,
    pub message: String,
}

impl FailureRecord {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            severity,
            message: message.into(),
        }
    }
}

/// Durable, append-only sink for failure records.
pub trait FailureLog: Send + Sync {
    fn append(&self, record: &FailureRecord) -> Result<(), NotifyError>;
}

/// External chat channel failure messages are mirrored to.
#[async_trait]
pub trait ChatRelay: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Records failures and relays them to the configured chat channel.
#[derive(Clone)]
pub struct FailureNotifier {
    log: Arc<dyn FailureLog>,
    relay: Option<Arc<dyn ChatRelay>>,
}

impl FailureNotifier {
    pub fn new(log: Arc<dyn FailureLog>, relay: Option<Arc<dyn ChatRelay>>) -> Self {
        Self { log, relay }
    }

    /// File log under `log_dir`, plus the Telegram relay when both the bot
    /// token and chat id are configured.
    pub fn from_config(config: &ServerConfig) -> Result<Self, NotifyError> {
        let log = FileFailureLog::open(
            &config.log_dir,
            config.log_max_bytes,
            config.log_max_backups,
        )?;

        let relay: Option<Arc<dyn ChatRelay>> =
            match (&config.telegram_bot_token, &config.telegram_chat_id) {
                (Some(bot_token), Some(chat_id)) => Some(Arc::new(TelegramRelay::new(
                    &config.telegram_api_url,
                    bot_token,
                    chat_id,
                    NOTIFICATION_TIMEOUT,
                )?)),
                _ => None,
            };

        Ok(Self::new(Arc::new(log), relay))
    }

    pub fn has_relay(&self) -> bool {
        self.relay.is_some()
    }

    /// Record a failure and start relaying it.
    ///
    /// The returned handle belongs to the detached relay task; callers on the
    /// request path drop it.
    pub fn notify(&self, message: impl Into<String>) -> Option<JoinHandle<()>> {
        let message = message.into();
        error!(%message, "Request failed");

        if let Err(e) = self.log.append(&FailureRecord::new(Severity::Error, &message)) {
            warn!(error = %e, "Failed to append failure record");
        }

        let relay = self.relay.clone()?;
        let log = Arc::clone(&self.log);
        Some(tokio::spawn(async move {
            let text = format!("{ALERT_PREFIX}{message}");
            if let Err(e) = relay.send(&text).await {
                warn!(error = %e, "Failed to relay failure notification");
                let record = FailureRecord::new(
                    Severity::Warning,
                    format!("Notification relay failed: {e}"),
                );
                if let Err(e) = log.append(&record) {
                    warn!(error = %e, "Failed to append failure record");
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    struct ChannelRelay(mpsc::UnboundedSender<String>);

    #[async_trait]
    impl ChatRelay for ChannelRelay {
        async fn send(&self, text: &str) -> Result<(), NotifyError> {
            let _ = self.0.send(text.to_string());
            Ok(())
        }
    }

    struct FailingRelay;

    #[async_trait]
    impl ChatRelay for FailingRelay {
        async fn send(&self, _text: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Relay("HTTP 502".to_string()))
        }
    }

    struct BrokenLog;

    impl FailureLog for BrokenLog {
        fn append(&self, _record: &FailureRecord) -> Result<(), NotifyError> {
            Err(NotifyError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_failure_record_json_shape() {
        let record = FailureRecord::new(Severity::Error, "boom");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["severity"], "error");
        assert_eq!(value["message"], "boom");
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }

    #[tokio::test]
    async fn test_notify_without_relay_only_logs() {
        let log = Arc::new(MemoryFailureLog::new());
        let notifier = FailureNotifier::new(log.clone(), None);

        assert!(notifier.notify("/text: Empty message").is_none());

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Error);
        assert_eq!(records[0].message, "/text: Empty message");
    }

    #[tokio::test]
    async fn test_notify_relays_with_prefix() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let log = Arc::new(MemoryFailureLog::new());
        let notifier = FailureNotifier::new(log.clone(), Some(Arc::new(ChannelRelay(tx))));

        notifier.notify("Unauthorized").unwrap().await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "🚨 Unauthorized");
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_relay_failure_is_logged_as_warning() {
        let log = Arc::new(MemoryFailureLog::new());
        let notifier = FailureNotifier::new(log.clone(), Some(Arc::new(FailingRelay)));

        notifier.notify("boom").unwrap().await.unwrap();

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].severity, Severity::Warning);
        assert!(records[1].message.contains("HTTP 502"));
    }

    #[tokio::test]
    async fn test_log_failure_is_swallowed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let notifier = FailureNotifier::new(Arc::new(BrokenLog), Some(Arc::new(ChannelRelay(tx))));

        notifier.notify("still relayed").unwrap().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "🚨 still relayed");
    }
}
