//! Shared startup: config, persona and driver assembly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alterego_agent::ConversationDriver;
use alterego_config::{AppConfig, ConfigError};
use alterego_core::error::PersonaError;
use alterego_core::persona::PersonaContext;
use alterego_tools::ToolRegistry;
use tracing::{debug, info};

/// The config file to use: `--config` if given, else the default location.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

/// Relative persona paths resolve against the config file's directory.
pub fn base_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn load_config(config_path: &Path) -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load_path(config_path)?;
    debug!(config = ?config, "Configuration loaded");
    Ok(config)
}

/// Read the persona documents and build the system prompt.
pub fn load_persona(config: &AppConfig, config_path: &Path) -> Result<PersonaContext, PersonaError> {
    let sources = config.persona_sources(&base_dir(config_path));
    let persona = sources.load()?;
    let context = PersonaContext::build(&persona);
    info!(
        persona = %persona.name,
        tokens = context.estimated_tokens(),
        "Persona context built"
    );
    Ok(context)
}

/// Wire provider, notifier and tools into a driver.
///
/// Fails before any conversation starts if a credential is missing.
pub fn build_driver(
    config: &AppConfig,
    persona: PersonaContext,
) -> Result<ConversationDriver, Box<dyn std::error::Error>> {
    config.validate_credentials()?;

    let provider = alterego_providers::build_from_config(config)?;
    let notifier = alterego_notify::build_from_config(config)?;
    info!(provider = provider.name(), notifier = notifier.name(), "Backends ready");

    let tools = Arc::new(ToolRegistry::new(notifier));
    Ok(ConversationDriver::from_config(config, provider, tools, persona))
}
