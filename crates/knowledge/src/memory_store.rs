//! In-process vector store.

use crate::types::{IndexedDocument, RetrievedDocument};
use crate::vector_store::{cosine_similarity, sort_by_score, VectorStore};
use folio_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug)]
struct Collection {
    dimension: usize,
    documents: Vec<IndexedDocument>,
}

/// Vector store kept in memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Store("memory store lock poisoned".to_string())
}

fn missing(collection: &str) -> AppError {
    AppError::Store(format!("collection '{}' does not exist", collection))
}

fn check_dimension(collection: &Collection, actual: usize) -> AppResult<()> {
    if collection.dimension != actual {
        return Err(AppError::Store(format!(
            "vector has {} dimensions, collection expects {}",
            actual, collection.dimension
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl VectorStore for MemoryStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn create_collection(&self, collection: &str, dimension: usize) -> AppResult<()> {
        let mut collections = self.collections.write().map_err(poisoned)?;

        if let Some(existing) = collections.get(collection) {
            if existing.dimension != dimension {
                return Err(AppError::Store(format!(
                    "collection '{}' exists with dimension {}, requested {}",
                    collection, existing.dimension, dimension
                )));
            }
            return Ok(());
        }

        collections.insert(
            collection.to_string(),
            Collection {
                dimension,
                documents: Vec::new(),
            },
        );
        tracing::debug!("Created memory collection '{}' ({} dims)", collection, dimension);
        Ok(())
    }

    async fn upsert(&self, collection: &str, document: &IndexedDocument) -> AppResult<()> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| missing(collection))?;
        check_dimension(entry, document.embedding.len())?;

        match entry.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document.clone(),
            None => entry.documents.push(document.clone()),
        }
        Ok(())
    }

    async fn query_nearest(
        &self,
        collection: &str,
        vector: &[f32],
        k: usize,
    ) -> AppResult<Vec<RetrievedDocument>> {
        let collections = self.collections.read().map_err(poisoned)?;
        let entry = collections.get(collection).ok_or_else(|| missing(collection))?;
        check_dimension(entry, vector.len())?;

        let mut results: Vec<RetrievedDocument> = entry
            .documents
            .iter()
            .map(|doc| RetrievedDocument {
                id: doc.id.clone(),
                text: doc.text.clone(),
                metadata: doc.metadata.clone(),
                score: cosine_similarity(vector, &doc.embedding),
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(k);
        Ok(results)
    }

    async fn count(&self, collection: &str) -> AppResult<usize> {
        let collections = self.collections.read().map_err(poisoned)?;
        collections
            .get(collection)
            .map(|c| c.documents.len())
            .ok_or_else(|| missing(collection))
    }

    async fn clear(&self, collection: &str) -> AppResult<()> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| missing(collection))?;
        entry.documents.clear();
        Ok(())
    }
}
