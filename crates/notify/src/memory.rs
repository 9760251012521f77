//! In-memory notifier: records every alert instead of delivering it.

use std::sync::Mutex;

use async_trait::async_trait;
use alterego_core::error::NotifyError;
use alterego_core::notify::Notifier;

/// Keeps sent messages in order; handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    fn name(&self) -> &str {
        "memory"
    }

    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?
            .push(message.to_string());
        Ok(())
    }
}
