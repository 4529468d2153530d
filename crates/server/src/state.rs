//! Shared application state.

use axum::http::HeaderValue;
use folio_core::{AppConfig, AppError, AppResult};
use folio_knowledge::{create_provider, create_store, PipelineOptions, RagPipeline};
use std::sync::Arc;
use std::time::Duration;

/// Services built once at startup and shared by every request.
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,

    /// The single browser origin allowed to call the API
    pub cors_origin: HeaderValue,

    /// Upper bound on handling one chat request
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        pipeline: Arc<RagPipeline>,
        cors_origin: &str,
        request_timeout: Duration,
    ) -> AppResult<Self> {
        let cors_origin = HeaderValue::from_str(cors_origin).map_err(|e| {
            AppError::Config(format!("Invalid CORS origin '{}': {}", cors_origin, e))
        })?;

        Ok(Self {
            pipeline,
            cors_origin,
            request_timeout,
        })
    }

    /// Build providers, store and pipeline from validated configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let embedder = create_provider(&config.embedding, config.embedding_api_key.as_ref())?;
        let store = create_store(&config.store, config.store_token.as_ref())?;
        let llm = folio_llm::create_client(&config.llm, config.llm_api_key.as_ref())?;
        let prompt = folio_prompt::load_or_default(config.prompt.template_file.as_deref())?;

        tracing::debug!(
            embedding = embedder.provider_name(),
            store = store.backend_name(),
            llm = llm.provider_name(),
            prompt = %prompt.id,
            "Built services"
        );

        let pipeline = RagPipeline::new(
            embedder,
            store,
            llm,
            prompt,
            PipelineOptions::from_config(config),
        );

        Self::new(
            Arc::new(pipeline),
            &config.server.cors_origin,
            Duration::from_secs(config.server.request_timeout_secs),
        )
    }
}
