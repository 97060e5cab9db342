//! Telegram Bot API relay.
//!
//! - API Endpoint: `POST https://api.telegram.org/bot{token}/sendMessage`
//! - Request: form fields `chat_id` and `text`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use zeroize::Zeroize;

use super::{ChatRelay, NotifyError};

/// Timeout for a single relay call
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramRelay {
    http_client: Client,
    /// Full `sendMessage` URL; contains the bot token
    send_url: String,
    chat_id: String,
}

impl TelegramRelay {
    pub fn new(
        api_url: &str,
        bot_token: &str,
        chat_id: &str,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Relay(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            send_url: format!(
                "{}/bot{bot_token}/sendMessage",
                api_url.trim_end_matches('/')
            ),
            chat_id: chat_id.to_string(),
        })
    }
}

#[async_trait]
impl ChatRelay for TelegramRelay {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        debug!(chat_id = %self.chat_id, "Relaying failure notification");

        let response = self
            .http_client
            .post(&self.send_url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await
            // The URL carries the bot token.
            .map_err(|e| NotifyError::Relay(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Relay(format!(
                "Telegram API returned {status}: {}",
                body.trim()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TelegramRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramRelay")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl Drop for TelegramRelay {
    fn drop(&mut self) {
        self.send_url.zeroize();
    }
}
