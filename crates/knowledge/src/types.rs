//! Knowledge system type definitions.

use crate::projector;
use serde::{Deserialize, Serialize};

/// One project from the corpus file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    pub timeline: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A project as stored in the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Stable identity derived from the project title
    pub id: String,

    /// Projected text that was embedded
    pub text: String,

    /// Embedding vector
    pub embedding: Vec<f32>,

    /// Copy of the source record
    pub metadata: ProjectRecord,
}

impl IndexedDocument {
    /// Build the stored form of `record` with its embedding.
    pub fn from_record(record: &ProjectRecord, embedding: Vec<f32>) -> Self {
        Self {
            id: projector::document_id(record),
            text: projector::project(record),
            embedding,
            metadata: record.clone(),
        }
    }
}

/// A document returned by a nearest-neighbor query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub id: String,
    pub text: String,
    pub metadata: ProjectRecord,

    /// Similarity under the store's metric (higher is closer)
    pub score: f32,
}

/// Statistics from an indexing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Documents written to the store
    pub documents: usize,

    /// Documents in the collection after the run
    pub collection_size: usize,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_default_to_empty() {
        let record: ProjectRecord = serde_json::from_str(
            r#"{"title": "Alpha", "description": "A test project", "timeline": "2024"}"#,
        )
        .unwrap();
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_indexed_document_from_record() {
        let record = ProjectRecord {
            title: "Alpha".to_string(),
            description: "A test project".to_string(),
            timeline: "2024".to_string(),
            tags: vec!["demo".to_string()],
        };

        let doc = IndexedDocument::from_record(&record, vec![0.1, 0.2]);
        assert_eq!(doc.id, projector::document_id(&record));
        assert!(doc.text.starts_with("Project: Alpha"));
        assert_eq!(doc.metadata, record);
        assert_eq!(doc.embedding, vec![0.1, 0.2]);
    }
}
