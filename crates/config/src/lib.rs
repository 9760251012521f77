//! Configuration loading, validation, and management for AlterEgo.
//!
//! Loads configuration from `~/.alterego/config.toml` with environment
//! variable overrides. Ranges are validated on load; credential presence is
//! checked separately at startup via [`AppConfig::validate_credentials`].

use alterego_core::persona::PersonaSources;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Pushover's message endpoint.
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// The root configuration structure.
///
/// Maps directly to `~/.alterego/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier passed to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Who the assistant speaks as
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Operator alerting
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Conversation loop guards
    #[serde(default)]
    pub agent: AgentConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openrouter".into()
}
fn default_model() -> String {
    "deepseek/deepseek-chat-v3.1:free".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("persona", &self.persona)
            .field("notifier", &self.notifier)
            .field("agent", &self.agent)
            .field("providers", &self.providers)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Name of the individual being represented
    #[serde(default = "default_persona_name")]
    pub name: String,

    /// Free-text biography; relative paths resolve against the config directory
    #[serde(default = "default_summary_path")]
    pub summary_path: String,

    /// Resume transcript (text or markdown)
    #[serde(default = "default_resume_path")]
    pub resume_path: String,
}

fn default_persona_name() -> String {
    "Your Name".into()
}
fn default_summary_path() -> String {
    "summary.txt".into()
}
fn default_resume_path() -> String {
    "resume.md".into()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            summary_path: default_summary_path(),
            resume_path: default_resume_path(),
        }
    }
}

/// Which notifier backend delivers operator alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    /// Pushover push notifications
    #[default]
    Pushover,
    /// Write alerts to the log only
    Log,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub kind: NotifierKind,

    /// Pushover user key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Pushover application token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_pushover_url")]
    pub api_url: String,

    /// Per-send timeout; a timed-out send is dropped
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

fn default_pushover_url() -> String {
    PUSHOVER_API_URL.into()
}
fn default_notify_timeout() -> u64 {
    10
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::default(),
            user: None,
            token: None,
            api_url: default_pushover_url(),
            timeout_secs: default_notify_timeout(),
        }
    }
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("kind", &self.kind)
            .field("user", &redact(&self.user))
            .field("token", &redact(&self.token))
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum model calls per user message
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Timeout for a single model call
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,

    /// Shown to the visitor in place of any internal error
    #[serde(default = "default_apology")]
    pub apology: String,
}

fn default_max_iterations() -> u32 {
    10
}
fn default_model_timeout() -> u64 {
    60
}
fn default_apology() -> String {
    "Sorry, I ran into a problem answering that just now. Could you try again in a moment?".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            model_timeout_secs: default_model_timeout(),
            apology: default_apology(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.alterego/config.toml).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_path(&Self::config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, then apply environment overrides.
    ///
    /// Environment variables checked:
    /// - `ALTEREGO_API_KEY`, `OPENROUTER_API_KEY`, `OPENAI_API_KEY` (first wins)
    /// - `ALTEREGO_PROVIDER`, `ALTEREGO_MODEL`
    /// - `PUSHOVER_USER`, `PUSHOVER_TOKEN`
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Credentials from the environment only fill gaps left by the file;
    /// provider and model overrides always win.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = non_empty("ALTEREGO_API_KEY")
                .or_else(|| non_empty("OPENROUTER_API_KEY"))
                .or_else(|| non_empty("OPENAI_API_KEY"));
        }

        if let Some(provider) = non_empty("ALTEREGO_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = non_empty("ALTEREGO_MODEL") {
            self.model = model;
        }

        if self.notifier.user.is_none() {
            self.notifier.user = non_empty("PUSHOVER_USER");
        }
        if self.notifier.token.is_none() {
            self.notifier.token = non_empty("PUSHOVER_TOKEN");
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".alterego")
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }

        if self.agent.model_timeout_secs == 0 || self.notifier.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        if self.persona.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "persona.name must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check that every credential the configured backends need is present.
    ///
    /// Reports all missing credentials at once.
    pub fn validate_credentials(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.provider_requires_key() && self.resolved_api_key().is_none() {
            missing.push("api_key (or ALTEREGO_API_KEY / OPENROUTER_API_KEY)");
        }

        if self.notifier.kind == NotifierKind::Pushover {
            if self.notifier.user.is_none() {
                missing.push("notifier.user (or PUSHOVER_USER)");
            }
            if self.notifier.token.is_none() {
                missing.push("notifier.token (or PUSHOVER_TOKEN)");
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials(missing.join(", ")))
        }
    }

    /// The API key for the active provider: provider-specific first, then global.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.providers
            .get(&self.provider)
            .and_then(|p| p.api_key.clone())
            .or_else(|| self.api_key.clone())
    }

    /// A custom base URL for the active provider, if configured.
    pub fn resolved_api_url(&self) -> Option<String> {
        self.providers
            .get(&self.provider)
            .and_then(|p| p.api_url.clone())
    }

    fn provider_requires_key(&self) -> bool {
        self.provider != "ollama"
    }

    /// Resolve persona document paths against `base_dir`.
    pub fn persona_sources(&self, base_dir: &Path) -> PersonaSources {
        let resolve = |p: &str| {
            let path = PathBuf::from(p);
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        };

        PersonaSources {
            name: self.persona.name.clone(),
            summary_path: resolve(&self.persona.summary_path),
            resume_path: resolve(&self.persona.resume_path),
        }
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            persona: PersonaConfig::default(),
            notifier: NotifierConfig::default(),
            agent: AgentConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}
