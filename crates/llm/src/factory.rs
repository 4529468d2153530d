//! LLM provider factory.
//!
//! Builds the answer generator's client from the resolved configuration.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use folio_core::config::LlmSettings;
use folio_core::{AppError, AppResult, Secret};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client for the configured provider.
///
/// # Arguments
/// * `settings` - The `llm` section of the application config
/// * `api_key` - Resolved API key (required for OpenAI)
///
/// # Errors
/// Returns a `Config` error if the provider is unknown or a required key is
/// missing, and an `Llm` error if the HTTP client cannot be built.
pub fn create_client(
    settings: &LlmSettings,
    api_key: Option<&Secret>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider = ProviderType::parse(&settings.provider).ok_or_else(|| {
        AppError::Config(format!("Unknown LLM provider: {}", settings.provider))
    })?;

    let base_url = settings
        .base_url
        .as_deref()
        .unwrap_or_else(|| provider.default_base_url());
    let timeout = Duration::from_secs(settings.timeout_secs);

    tracing::debug!(
        provider = provider.as_str(),
        model = %settings.model,
        %base_url,
        "Creating LLM client"
    );

    match provider {
        ProviderType::OpenAI => {
            let key = api_key.ok_or_else(|| {
                AppError::Config(format!(
                    "OpenAI provider requires an API key in {}",
                    settings.api_key_env
                ))
            })?;
            Ok(Arc::new(OpenAiClient::new(base_url, key.expose(), timeout)?))
        }
        ProviderType::Ollama => Ok(Arc::new(OllamaClient::new(base_url, timeout)?)),
    }
}
