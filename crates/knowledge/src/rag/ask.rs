//! RAG answering orchestration.

use crate::embeddings::EmbeddingProvider;
use crate::projector;
use crate::rag::types::{ChatQuery, ChatResult, ChatStage, SourceDocument};
use crate::vector_store::VectorStore;
use folio_core::{AppConfig, AppError, AppResult};
use folio_llm::{LlmClient, LlmRequest};
use folio_prompt::{build_prompt, PromptDefinition, PromptVariables};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Upper bounds for each outbound stage of a chat request.
#[derive(Debug, Clone, Copy)]
pub struct StageTimeouts {
    pub embedding: Duration,
    pub retrieval: Duration,
    pub generation: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            embedding: Duration::from_secs(30),
            retrieval: Duration::from_secs(30),
            generation: Duration::from_secs(60),
        }
    }
}

/// Per-request settings for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub collection: String,
    pub top_k: usize,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeouts: StageTimeouts,
}

impl PipelineOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            collection: config.store.collection.clone(),
            top_k: config.retrieval.top_k,
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            timeouts: StageTimeouts {
                embedding: Duration::from_secs(config.embedding.timeout_secs),
                retrieval: Duration::from_secs(config.store.timeout_secs),
                generation: Duration::from_secs(config.llm.timeout_secs),
            },
        }
    }
}

/// Question answering over an indexed collection.
///
/// Built once at startup and shared across requests. Holds no per-request
/// state.
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    options: PipelineOptions,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmClient>,
        prompt: PromptDefinition,
        options: PipelineOptions,
    ) -> Self {
        Self {
            embedder,
            store,
            llm,
            prompt,
            options,
        }
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    pub fn collection(&self) -> &str {
        &self.options.collection
    }

    /// Answer `query` from the indexed projects.
    ///
    /// Any failure in embedding, retrieval, prompt rendering or generation
    /// is returned as an error; nothing is retried.
    pub async fn ask(&self, query: &ChatQuery) -> AppResult<ChatResult> {
        let start = Instant::now();
        let timeouts = &self.options.timeouts;
        log_stage(ChatStage::Received, start);

        let vector = with_timeout(
            "embedding the question",
            timeouts.embedding,
            self.embedder.embed(&query.question),
        )
        .await?;
        log_stage(ChatStage::Embedded, start);

        let retrieved = with_timeout(
            "querying the vector store",
            timeouts.retrieval,
            self.store
                .query_nearest(&self.options.collection, &vector, self.options.top_k),
        )
        .await?;
        log_stage(ChatStage::Retrieved, start);

        if let Some(top) = retrieved.first() {
            tracing::debug!(
                "Retrieved {} documents (top: '{}', score {:.3})",
                retrieved.len(),
                top.metadata.title,
                top.score
            );
        } else {
            tracing::debug!("No documents retrieved from '{}'", self.options.collection);
        }

        let context = projector::join_context(retrieved.iter().map(|d| d.text.as_str()));
        let variables = PromptVariables {
            question: query.question.clone(),
            context,
            history: query.history_turns(),
        };
        let built = build_prompt(&self.prompt, &variables)?;
        log_stage(ChatStage::PromptBuilt, start);

        let mut request = LlmRequest::new(built.user, &self.options.model)
            .with_temperature(self.options.temperature);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        if let Some(max_tokens) = self.options.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let response = with_timeout(
            "generating the answer",
            timeouts.generation,
            self.llm.complete(&request),
        )
        .await?;
        log_stage(ChatStage::Answered, start);

        tracing::info!(
            "Answered question with {} sources using {} ({}) in {}ms",
            retrieved.len(),
            response.model,
            self.llm.provider_name(),
            start.elapsed().as_millis()
        );

        Ok(ChatResult {
            answer: response.content,
            source_documents: retrieved.into_iter().map(SourceDocument::from).collect(),
        })
    }
}

fn log_stage(stage: ChatStage, start: Instant) {
    tracing::debug!(
        stage = stage.as_str(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Chat stage reached"
    );
}

async fn with_timeout<T, F>(stage: &str, limit: Duration, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout(stage, limit.as_secs())),
    }
}
