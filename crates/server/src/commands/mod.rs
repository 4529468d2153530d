//! Command handlers for the `folio` binary.

pub mod index;
pub mod serve;

pub use index::IndexCommand;
pub use serve::ServeCommand;

use folio_core::{AppConfig, AppResult};
use folio_knowledge::{
    index_corpus, load_corpus, EmbeddingProvider, IndexOptions, IndexStats, VectorStore,
};

/// Load the configured corpus and index it into the configured collection.
pub(crate) async fn index_configured_corpus(
    config: &AppConfig,
    embedder: &dyn EmbeddingProvider,
    store: &dyn VectorStore,
    reset: bool,
) -> AppResult<IndexStats> {
    let records = load_corpus(&config.corpus.path)?;

    let options = IndexOptions {
        reset,
        batch_size: config.embedding.batch_size,
    };

    index_corpus(
        &records,
        embedder,
        store,
        &config.store.collection,
        &options,
    )
    .await
}
