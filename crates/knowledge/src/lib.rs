//! Project knowledge base and retrieval-augmented answering.
//!
//! Loads the project corpus, embeds each project's text projection, stores
//! the vectors, and answers questions grounded on the nearest projects.

pub mod astra_store;
pub mod corpus;
pub mod embeddings;
pub mod index;
pub mod memory_store;
pub mod projector;
pub mod rag;
pub mod types;
pub mod vector_store;

#[cfg(test)]
mod tests;

pub use corpus::{load_corpus, parse_corpus};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::{index_corpus, prepare_collection, IndexOptions};
pub use rag::{ChatQuery, ChatResult, PipelineOptions, RagPipeline, SourceDocument, StageTimeouts};
pub use types::{IndexStats, IndexedDocument, ProjectRecord, RetrievedDocument};
pub use vector_store::{create_store, VectorStore};
