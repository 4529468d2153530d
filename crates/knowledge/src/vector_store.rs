//! Vector store abstraction.
//!
//! A store holds named collections of [`IndexedDocument`]s keyed by id and
//! answers nearest-neighbor queries under cosine similarity.

use crate::astra_store::AstraStore;
use crate::memory_store::MemoryStore;
use crate::types::{IndexedDocument, RetrievedDocument};
use folio_core::config::StoreSettings;
use folio_core::{AppError, AppResult, Secret};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Trait for vector store backends.
///
/// Implementations must:
/// - treat `upsert` as insert-or-replace keyed on the document id
/// - return at most `k` results from `query_nearest`, most similar first
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name (e.g., "astra", "memory")
    fn backend_name(&self) -> &str;

    /// Create a collection if it does not already exist.
    async fn create_collection(&self, collection: &str, dimension: usize) -> AppResult<()>;

    /// Insert a document, replacing any existing document with the same id.
    async fn upsert(&self, collection: &str, document: &IndexedDocument) -> AppResult<()>;

    /// Return the `k` documents closest to `vector`.
    async fn query_nearest(
        &self,
        collection: &str,
        vector: &[f32],
        k: usize,
    ) -> AppResult<Vec<RetrievedDocument>>;

    /// Number of documents in the collection.
    async fn count(&self, collection: &str) -> AppResult<usize>;

    /// Remove every document from the collection.
    async fn clear(&self, collection: &str) -> AppResult<()>;
}

/// Create a vector store based on configuration.
pub fn create_store(
    settings: &StoreSettings,
    token: Option<&Secret>,
) -> AppResult<Arc<dyn VectorStore>> {
    match settings.backend.as_str() {
        "astra" => {
            let endpoint = settings.api_endpoint.as_deref().ok_or_else(|| {
                AppError::Config(
                    "Astra backend requires ASTRA_DB_API_ENDPOINT or ASTRA_DB_ID and ASTRA_DB_REGION"
                        .to_string(),
                )
            })?;
            let token = token.ok_or_else(|| {
                AppError::Config(format!(
                    "Astra backend requires a token in {}",
                    settings.token_env
                ))
            })?;
            let store = AstraStore::new(
                endpoint,
                &settings.keyspace,
                token.expose(),
                Duration::from_secs(settings.timeout_secs),
            )?;
            Ok(Arc::new(store))
        }

        "memory" => Ok(Arc::new(MemoryStore::new())),

        _ => Err(AppError::Config(format!(
            "Unknown store backend: '{}'. Supported backends: astra, memory",
            settings.backend
        ))),
    }
}

/// Cosine similarity of two equal-length vectors. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    let denom = norm_a * norm_b;
    if denom <= f32::EPSILON {
        return 0.0;
    }
    dot / denom
}

/// Sort by descending score, keeping input order among equal scores.
pub(crate) fn sort_by_score(results: &mut [RetrievedDocument]) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
