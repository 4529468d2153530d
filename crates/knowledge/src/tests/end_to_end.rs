//! Corpus file to answer, through the configured factories.

use crate::corpus::load_corpus;
use crate::embeddings::create_provider;
use crate::index::{index_corpus, IndexOptions};
use crate::rag::{ChatQuery, PipelineOptions, RagPipeline};
use crate::vector_store::create_store;
use folio_core::{AppConfig, AppResult};
use folio_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

struct EchoLlm;

#[async_trait::async_trait]
impl LlmClient for EchoLlm {
    fn provider_name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        Ok(LlmResponse {
            content: format!("Answered from {} bytes of prompt", request.prompt.len()),
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

fn offline_config(corpus: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.corpus.path = corpus.to_path_buf();
    config.embedding.provider = "hashing".to_string();
    config.embedding.dimensions = 256;
    config.store.backend = "memory".to_string();
    config
}

fn corpus_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"projects": [
            {{"id": "1", "title": "Alpha", "description": "A test project", "timeline": "2024", "tags": ["demo"]}},
            {{"id": "2", "title": "Orbit", "description": "Satellite tracking map", "timeline": "2022", "tags": ["maps", "space"]}},
            {{"id": "3", "title": "Ledger", "description": "Personal budgeting tool", "timeline": "2023"}}
        ]}}"#
    )
    .unwrap();
    file
}

async fn build_pipeline(config: &AppConfig) -> RagPipeline {
    let records = load_corpus(&config.corpus.path).unwrap();
    let embedder = create_provider(&config.embedding, None).unwrap();
    let store = create_store(&config.store, None).unwrap();

    let stats = index_corpus(
        &records,
        embedder.as_ref(),
        store.as_ref(),
        &config.store.collection,
        &IndexOptions::default(),
    )
    .await
    .unwrap();
    assert_eq!(stats.collection_size, records.len());

    RagPipeline::new(
        embedder,
        store,
        Arc::new(EchoLlm),
        folio_prompt::default_prompt(),
        PipelineOptions::from_config(config),
    )
}

#[tokio::test]
async fn test_question_about_alpha_returns_alpha() {
    let file = corpus_file();
    let config = offline_config(file.path());
    let pipeline = build_pipeline(&config).await;

    let result = pipeline
        .ask(&ChatQuery::new("What is the Alpha project?"))
        .await
        .unwrap();

    assert!(!result.answer.is_empty());
    assert!(result.source_documents.len() <= config.retrieval.top_k);
    assert_eq!(result.source_documents[0].title, "Alpha");
    assert_eq!(result.source_documents[0].description, "A test project");
}

#[tokio::test]
async fn test_reindexing_same_corpus_keeps_count() {
    let file = corpus_file();
    let config = offline_config(file.path());
    let pipeline = build_pipeline(&config).await;

    let records = load_corpus(&config.corpus.path).unwrap();
    let stats = index_corpus(
        &records,
        pipeline.embedder().as_ref(),
        pipeline.store().as_ref(),
        pipeline.collection(),
        &IndexOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(stats.documents, 3);
    assert_eq!(stats.collection_size, 3);
}

#[tokio::test]
async fn test_scores_are_ordered() {
    let file = corpus_file();
    let config = offline_config(file.path());
    let pipeline = build_pipeline(&config).await;

    let result = pipeline
        .ask(&ChatQuery::new("satellite maps"))
        .await
        .unwrap();

    assert_eq!(result.source_documents[0].title, "Orbit");
    assert!(result
        .source_documents
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
}
