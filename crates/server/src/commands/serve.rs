//! Serve command handler.

use clap::Args;
use folio_core::{AppConfig, AppError, AppResult};
use folio_knowledge::prepare_collection;
use folio_server::{router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Index the corpus, then serve the chat API
#[derive(Args, Debug, Default)]
pub struct ServeCommand {
    /// Address to listen on (overrides server.bind)
    #[arg(long)]
    pub bind: Option<String>,

    /// Serve the existing collection without indexing
    #[arg(long)]
    pub skip_index: bool,

    /// Clear the collection before indexing
    #[arg(long, conflicts_with = "skip_index")]
    pub reset: bool,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let state = Arc::new(AppState::from_config(config)?);
        let pipeline = &state.pipeline;

        if self.skip_index {
            tracing::info!("Skipping indexing; serving existing collection");
            prepare_collection(
                pipeline.embedder().as_ref(),
                pipeline.store().as_ref(),
                pipeline.collection(),
            )
            .await?;
        } else {
            super::index_configured_corpus(
                config,
                pipeline.embedder().as_ref(),
                pipeline.store().as_ref(),
                self.reset,
            )
            .await?;
        }

        let listener = TcpListener::bind(&config.server.bind).await.map_err(|e| {
            AppError::Config(format!("Failed to bind {}: {}", config.server.bind, e))
        })?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
