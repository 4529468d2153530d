//! Embedding provider trait and factory.

use super::providers::{HashingProvider, OpenAiEmbeddingProvider};
use folio_core::config::EmbeddingSettings;
use folio_core::{AppError, AppResult, Secret};
use std::sync::Arc;
use std::time::Duration;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "openai", "hashing")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in one call, in input order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
pub fn create_provider(
    settings: &EmbeddingSettings,
    api_key: Option<&Secret>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "openai" => {
            let key = api_key.ok_or_else(|| {
                AppError::Config(format!(
                    "OpenAI embeddings require an API key in {}",
                    settings.api_key_env
                ))
            })?;
            let provider = OpenAiEmbeddingProvider::new(
                settings
                    .base_url
                    .as_deref()
                    .unwrap_or(super::providers::openai::DEFAULT_OPENAI_URL),
                key.expose(),
                &settings.model,
                settings.dimensions,
                Duration::from_secs(settings.timeout_secs),
            )?;
            Ok(Arc::new(provider))
        }

        "hashing" => Ok(Arc::new(HashingProvider::new(settings.dimensions))),

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: openai, hashing",
            settings.provider
        ))),
    }
}

/// Check that every vector has the expected length.
pub(crate) fn check_dimensions(
    provider: &str,
    expected: usize,
    vectors: &[Vec<f32>],
) -> AppResult<()> {
    if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
        return Err(AppError::Embedding(format!(
            "{} returned {} dimensions, expected {}",
            provider,
            bad.len(),
            expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> EmbeddingSettings {
        EmbeddingSettings {
            provider: provider.to_string(),
            dimensions: 64,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_hashing_provider() {
        let provider = create_provider(&settings("hashing"), None).unwrap();
        assert_eq!(provider.provider_name(), "hashing");
        assert_eq!(provider.dimensions(), 64);
    }

    #[test]
    fn test_create_openai_provider() {
        let key = Secret::new("sk-test");
        let provider = create_provider(&settings("openai"), Some(&key)).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model_name(), "text-embedding-ada-002");
    }

    #[test]
    fn test_openai_without_key_is_config_error() {
        let result = create_provider(&settings("openai"), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = create_provider(&settings("unknown"), None);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let provider = create_provider(&settings("hashing"), None).unwrap();
        let embedding = provider.embed("test text").await.unwrap();
        assert_eq!(embedding.len(), 64);
    }

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions("p", 2, &[vec![0.0, 1.0]]).is_ok());
        let err = check_dimensions("p", 3, &[vec![0.0, 1.0]]).unwrap_err();
        assert!(err.to_string().contains("returned 2 dimensions, expected 3"));
    }
}
