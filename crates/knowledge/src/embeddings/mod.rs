//! Embedding generation.
//!
//! Providers turn text into fixed-length vectors. The same provider must be
//! used for indexing and querying a collection.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};

use folio_core::{AppError, AppResult};

/// Embed `texts` in batches of at most `batch_size`, preserving order.
pub async fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
) -> AppResult<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    if batch_size == 0 {
        return Err(AppError::Config(
            "embedding batch size must be greater than zero".to_string(),
        ));
    }

    tracing::info!(
        "Embedding {} texts using provider '{}' (model: {})",
        texts.len(),
        provider.provider_name(),
        provider.model_name()
    );

    let mut embeddings = Vec::with_capacity(texts.len());
    for (batch_number, batch) in texts.chunks(batch_size).enumerate() {
        let vectors = provider.embed_batch(batch).await?;
        if vectors.len() != batch.len() {
            return Err(AppError::Embedding(format!(
                "provider returned {} embeddings for {} texts",
                vectors.len(),
                batch.len()
            )));
        }
        tracing::debug!("Embedded batch {} ({} texts)", batch_number + 1, batch.len());
        embeddings.extend(vectors);
    }

    tracing::debug!(
        "Generated {} embeddings of dimension {}",
        embeddings.len(),
        provider.dimensions()
    );

    Ok(embeddings)
}
