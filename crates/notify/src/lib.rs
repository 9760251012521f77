//! Notification backends for AlterEgo.
//!
//! All notifiers implement `alterego_core::Notifier`. Delivery problems are
//! logged and absorbed; a conversation never fails because an alert could
//! not be sent.

pub mod log_notifier;
pub mod memory;
pub mod pushover;

use std::sync::Arc;

use alterego_config::{AppConfig, NotifierKind};
use alterego_core::error::NotifyError;
use alterego_core::notify::Notifier;

pub use log_notifier::LogNotifier;
pub use memory::MemoryNotifier;
pub use pushover::{PushoverConfig, PushoverNotifier};

/// Build the notifier selected by `config.notifier.kind`.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config.notifier.kind {
        NotifierKind::Log => Ok(Arc::new(LogNotifier)),
        NotifierKind::Pushover => {
            let user = config.notifier.user.clone().ok_or_else(|| {
                NotifyError::NotConfigured("pushover user key is missing".into())
            })?;
            let token = config.notifier.token.clone().ok_or_else(|| {
                NotifyError::NotConfigured("pushover token is missing".into())
            })?;

            Ok(Arc::new(PushoverNotifier::new(PushoverConfig {
                api_url: config.notifier.api_url.clone(),
                user,
                token,
                timeout: std::time::Duration::from_secs(config.notifier.timeout_secs),
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_kind_builds_log_notifier() {
        let mut config = AppConfig::default();
        config.notifier.kind = NotifierKind::Log;
        let notifier = build_from_config(&config).unwrap();
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn pushover_requires_credentials() {
        let err = build_from_config(&AppConfig::default()).err().unwrap();
        assert!(matches!(err, NotifyError::NotConfigured(_)));
    }

    #[test]
    fn pushover_builds_with_credentials() {
        let mut config = AppConfig::default();
        config.notifier.user = Some("u".into());
        config.notifier.token = Some("t".into());
        let notifier = build_from_config(&config).unwrap();
        assert_eq!(notifier.name(), "pushover");
    }
}
