//! Corpus indexing.
//!
//! Embeds every record's projection and upserts it into the vector store.
//! Documents are keyed on the title hash, so running the indexer again over
//! the same corpus replaces documents instead of duplicating them.

use crate::embeddings::{embed_in_batches, EmbeddingProvider};
use crate::projector;
use crate::types::{IndexStats, IndexedDocument, ProjectRecord};
use crate::vector_store::VectorStore;
use folio_core::{AppError, AppResult};
use std::time::Instant;

/// Options for an indexing run.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Clear the collection before indexing
    pub reset: bool,

    /// Maximum texts per embedding request
    pub batch_size: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            reset: false,
            batch_size: 100,
        }
    }
}

/// Ensure the collection exists with the embedder's dimension.
pub async fn prepare_collection(
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    collection: &str,
) -> AppResult<()> {
    store
        .create_collection(collection, embedder.dimensions())
        .await
}

/// Embed and store every record in `records`.
pub async fn index_corpus(
    records: &[ProjectRecord],
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    collection: &str,
    options: &IndexOptions,
) -> AppResult<IndexStats> {
    let start = Instant::now();

    tracing::info!(
        "Indexing {} projects into '{}' ({} backend)",
        records.len(),
        collection,
        store.backend_name()
    );

    prepare_collection(embedder, store, collection).await?;

    if options.reset {
        tracing::info!("Resetting collection '{}'", collection);
        store.clear(collection).await?;
    }

    let texts: Vec<String> = records.iter().map(projector::project).collect();
    let embeddings = embed_in_batches(embedder, &texts, options.batch_size).await?;

    if embeddings.len() != records.len() {
        return Err(AppError::Embedding(format!(
            "received {} embeddings for {} projects",
            embeddings.len(),
            records.len()
        )));
    }

    let mut documents = 0usize;
    for (record, embedding) in records.iter().zip(embeddings) {
        let document = IndexedDocument::from_record(record, embedding);
        store.upsert(collection, &document).await?;
        documents += 1;
        tracing::debug!("Indexed '{}' as {}", record.title, document.id);
    }

    let collection_size = store.count(collection).await?;
    let duration = start.elapsed();

    tracing::info!(
        "Indexing completed: {} documents written, {} in collection, {:.2}s",
        documents,
        collection_size,
        duration.as_secs_f64()
    );

    Ok(IndexStats {
        documents,
        collection_size,
        duration_ms: duration.as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::HashingProvider;
    use crate::memory_store::MemoryStore;

    fn record(title: &str, description: &str) -> ProjectRecord {
        ProjectRecord {
            title: title.to_string(),
            description: description.to_string(),
            timeline: "2024".to_string(),
            tags: vec!["demo".to_string()],
        }
    }

    #[tokio::test]
    async fn test_index_corpus_writes_every_record() {
        let embedder = HashingProvider::new(64);
        let store = MemoryStore::new();
        let records = vec![record("Alpha", "first"), record("Beta", "second")];

        let stats = index_corpus(&records, &embedder, &store, "projects", &IndexOptions::default())
            .await
            .unwrap();

        assert_eq!(stats.documents, 2);
        assert_eq!(stats.collection_size, 2);
    }

    #[tokio::test]
    async fn test_reindex_does_not_duplicate() {
        let embedder = HashingProvider::new(64);
        let store = MemoryStore::new();
        let records = vec![record("Alpha", "first"), record("Beta", "second")];
        let options = IndexOptions::default();

        index_corpus(&records, &embedder, &store, "projects", &options)
            .await
            .unwrap();
        let stats = index_corpus(&records, &embedder, &store, "projects", &options)
            .await
            .unwrap();

        assert_eq!(stats.collection_size, 2);
    }

    #[tokio::test]
    async fn test_reset_drops_removed_records() {
        let embedder = HashingProvider::new(64);
        let store = MemoryStore::new();

        index_corpus(
            &[record("Alpha", "first"), record("Beta", "second")],
            &embedder,
            &store,
            "projects",
            &IndexOptions::default(),
        )
        .await
        .unwrap();

        let stats = index_corpus(
            &[record("Alpha", "first")],
            &embedder,
            &store,
            "projects",
            &IndexOptions {
                reset: true,
                batch_size: 1,
            },
        )
        .await
        .unwrap();

        assert_eq!(stats.collection_size, 1);
    }

    #[tokio::test]
    async fn test_empty_corpus() {
        let embedder = HashingProvider::new(8);
        let store = MemoryStore::new();

        let stats = index_corpus(&[], &embedder, &store, "projects", &IndexOptions::default())
            .await
            .unwrap();

        assert_eq!(stats.documents, 0);
        assert_eq!(stats.collection_size, 0);
    }
}
