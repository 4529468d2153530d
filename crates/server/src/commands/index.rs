//! Index command handler.

use clap::Args;
use folio_core::{AppConfig, AppResult};
use folio_knowledge::{create_provider, create_store};

/// Embed the corpus into the vector store and exit
#[derive(Args, Debug, Default)]
pub struct IndexCommand {
    /// Clear the collection before indexing
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index command");

        let embedder = create_provider(&config.embedding, config.embedding_api_key.as_ref())?;
        let store = create_store(&config.store, config.store_token.as_ref())?;

        let stats =
            super::index_configured_corpus(config, embedder.as_ref(), store.as_ref(), self.reset)
                .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!(
                "Indexed {} projects into '{}' ({} in collection) in {}ms",
                stats.documents, config.store.collection, stats.collection_size, stats.duration_ms
            );
        }

        Ok(())
    }
}
