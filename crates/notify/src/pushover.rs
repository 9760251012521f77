//! Pushover notifier.
//!
//! POSTs `{message, user, token}` as JSON to the Pushover messages endpoint.
//! Each send is bounded by a timeout; a send that times out or fails is
//! reported as a [`NotifyError`] and dropped by [`Notifier::notify`].

use std::time::Duration;

use async_trait::async_trait;
use alterego_core::error::NotifyError;
use alterego_core::notify::Notifier;
use serde::Serialize;
use tracing::debug;

/// Pushover connection settings.
#[derive(Clone)]
pub struct PushoverConfig {
    pub api_url: String,
    /// User (or group) key that receives the alert
    pub user: String,
    /// Application API token
    pub token: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverConfig")
            .field("api_url", &self.api_url)
            .field("user", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct PushoverNotifier {
    config: PushoverConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct PushoverMessage<'a> {
    message: &'a str,
    user: &'a str,
    token: &'a str,
}

impl PushoverNotifier {
    pub fn new(config: PushoverConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn post(&self, message: &str) -> Result<(), NotifyError> {
        let payload = PushoverMessage {
            message,
            user: &self.config.user,
            token: &self.config.token,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::DeliveryFailed(format!(
                "pushover returned {status}: {body}"
            )));
        }

        debug!(len = message.len(), "Pushover alert delivered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        match tokio::time::timeout(self.config.timeout, self.post(message)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }),
        }
    }
}
