//! Provider selection: build the configured LLM backend.

use std::sync::Arc;
use std::time::Duration;

use alterego_config::AppConfig;
use alterego_core::error::ProviderError;
use alterego_core::provider::Provider;
use tracing::debug;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the provider named by `config.provider`.
///
/// A `[providers.<name>]` table can override the API key and base URL.
/// Providers without a well-known base URL must set `api_url`.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.provider.as_str();

    let base_url = config
        .resolved_api_url()
        .or_else(|| default_base_url(name).map(String::from))
        .ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "no base URL known for provider '{name}'; set providers.{name}.api_url"
            ))
        })?;

    let api_key = match config.resolved_api_key() {
        Some(key) => key,
        None if name == "ollama" => "ollama".into(),
        None => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for provider '{name}'"
            )));
        }
    };

    debug!(provider = name, base_url = %base_url, "Building provider");

    let provider = OpenAiCompatProvider::new(name, base_url, api_key)
        .with_timeout(Duration::from_secs(config.agent.model_timeout_secs));

    Ok(Arc::new(provider))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    let url = match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1",
        "openai" => "https://api.openai.com/v1",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "fireworks" => "https://api.fireworks.ai/inference/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alterego_config::ProviderConfig;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").unwrap().contains("openrouter.ai"));
        assert!(default_base_url("openai").unwrap().contains("api.openai.com"));
        assert!(default_base_url("ollama").unwrap().contains("localhost:11434"));
        assert!(default_base_url("mystery").is_none());
    }

    #[test]
    fn build_openrouter_with_key() {
        let config = AppConfig {
            api_key: Some("sk-or-test".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openrouter");
    }

    #[test]
    fn missing_key_is_not_configured() {
        let err = build_from_config(&AppConfig::default()).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = AppConfig {
            provider: "ollama".into(),
            ..AppConfig::default()
        };
        assert!(build_from_config(&config).is_ok());
    }

    #[test]
    fn custom_provider_requires_url() {
        let mut config = AppConfig {
            provider: "acme".into(),
            api_key: Some("k".into()),
            ..AppConfig::default()
        };
        assert!(build_from_config(&config).is_err());

        config.providers.insert(
            "acme".into(),
            ProviderConfig {
                api_key: None,
                api_url: Some("https://llm.acme.test/v1".into()),
            },
        );
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "acme");
    }
}
