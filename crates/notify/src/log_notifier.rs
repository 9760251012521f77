//! Log-only notifier: writes alerts to the tracing output.
//!
//! Useful for local runs without Pushover credentials.

use async_trait::async_trait;
use alterego_core::error::NotifyError;
use alterego_core::notify::Notifier;
use tracing::info;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        info!(target: "alterego::notify", message = %message, "Operator alert");
        Ok(())
    }
}
