//! Error types for the AlterEgo domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for all AlterEgo operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Agent loop errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Persona / document errors ---
    #[error("Persona error: {0}")]
    Persona(#[from] PersonaError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments for {tool_name}: {reason}")]
    InvalidArguments { tool_name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("No final answer after {iterations} model calls")]
    Inconclusive { iterations: u32 },

    #[error("Model returned an empty answer")]
    EmptyAnswer,
}

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("Failed to read document at {path}: {reason}")]
    DocumentUnreadable { path: String, reason: String },

    #[error("Document at {path} is empty")]
    DocumentEmpty { path: String },
}

/// Notification delivery failure.
///
/// Never propagated past a [`crate::Notifier`]; implementations log and
/// absorb it.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Notification timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Notifier not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::InvalidArguments {
            tool_name: "record_user_details".into(),
            reason: "missing field `user_email`".into(),
        });
        assert!(err.to_string().contains("record_user_details"));
        assert!(err.to_string().contains("user_email"));
    }

    #[test]
    fn inconclusive_reports_iterations() {
        let err = Error::from(AgentError::Inconclusive { iterations: 10 });
        assert!(err.to_string().contains("10 model calls"));
    }
}
