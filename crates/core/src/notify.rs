//! Notifier trait: the outbound alerting seam.
//!
//! A Notifier pushes a one-line event message to a human operator (captured
//! contact, unanswered question). Delivery is fire-and-forget: callers use
//! [`Notifier::notify`], which never fails.

use async_trait::async_trait;
use tracing::warn;
use crate::error::NotifyError;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// A human-readable name for this notifier (e.g., "pushover").
    fn name(&self) -> &str;

    /// Attempt delivery and report the outcome.
    async fn send(&self, message: &str) -> Result<(), NotifyError>;

    /// Deliver and swallow any failure.
    async fn notify(&self, message: &str) {
        if let Err(e) = self.send(message).await {
            warn!(notifier = %self.name(), error = %e, "Notification dropped");
        }
    }
}
