//! Router tests driving `/api/chat` and `/health` with in-process services.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use folio_core::{AppError, AppResult};
use folio_knowledge::embeddings::providers::HashingProvider;
use folio_knowledge::memory_store::MemoryStore;
use folio_knowledge::{
    index_corpus, EmbeddingProvider, IndexOptions, PipelineOptions, ProjectRecord, RagPipeline,
    StageTimeouts, VectorStore,
};
use folio_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use folio_server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`

const ORIGIN: &str = "http://localhost:5173";

struct CannedLlm;

#[async_trait::async_trait]
impl LlmClient for CannedLlm {
    fn provider_name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        Ok(LlmResponse {
            content: "Alpha is a test project from 2024.".to_string(),
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

struct BrokenLlm;

#[async_trait::async_trait]
impl LlmClient for BrokenLlm {
    fn provider_name(&self) -> &str {
        "broken"
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        Err(AppError::Llm("completion service returned 503".to_string()))
    }
}

struct StalledLlm;

#[async_trait::async_trait]
impl LlmClient for StalledLlm {
    fn provider_name(&self) -> &str {
        "stalled"
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(AppError::Llm("unreachable".to_string()))
    }
}

/// Embeds like the hashing provider during indexing, then fails once armed.
#[derive(Debug)]
struct FlakyEmbedder {
    inner: HashingProvider,
    failing: std::sync::atomic::AtomicBool,
}

impl FlakyEmbedder {
    fn new() -> Self {
        Self {
            inner: HashingProvider::new(128),
            failing: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn arm(&self) {
        self.failing
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    fn provider_name(&self) -> &str {
        "flaky"
    }

    fn model_name(&self) -> &str {
        "flaky-v1"
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::Embedding("embedding service unreachable".to_string()));
        }
        self.inner.embed_batch(texts).await
    }
}

fn alpha() -> ProjectRecord {
    ProjectRecord {
        title: "Alpha".to_string(),
        description: "A test project".to_string(),
        timeline: "2024".to_string(),
        tags: vec!["demo".to_string()],
    }
}

async fn app_with(
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmClient>,
    request_timeout: Duration,
) -> Router {
    let store: Arc<dyn VectorStore> = Arc::new(MemoryStore::new());
    index_corpus(
        &[alpha()],
        embedder.as_ref(),
        store.as_ref(),
        "projects",
        &IndexOptions::default(),
    )
    .await
    .unwrap();

    let options = PipelineOptions {
        collection: "projects".to_string(),
        top_k: 3,
        model: "test-model".to_string(),
        temperature: 0.7,
        max_tokens: None,
        timeouts: StageTimeouts::default(),
    };
    let pipeline = RagPipeline::new(
        embedder,
        store,
        llm,
        folio_prompt::default_prompt(),
        options,
    );

    let state = AppState::new(Arc::new(pipeline), ORIGIN, request_timeout).unwrap();
    router(Arc::new(state))
}

async fn app(llm: Arc<dyn LlmClient>) -> Router {
    app_with(
        Arc::new(HashingProvider::new(128)),
        llm,
        Duration::from_secs(10),
    )
    .await
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_chat_returns_answer_and_alpha_source() {
    let response = app(Arc::new(CannedLlm))
        .await
        .oneshot(chat_request(r#"{"question": "Tell me about Alpha"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert!(!body["answer"].as_str().unwrap().is_empty());

    let sources = body["source_documents"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["title"], "Alpha");
    assert_eq!(sources[0]["description"], "A test project");
    assert_eq!(sources[0]["timeline"], "2024");
    assert_eq!(sources[0]["tags"], json!(["demo"]));
    assert!(sources[0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Project: Alpha"));
}

#[tokio::test]
async fn test_chat_accepts_history() {
    let response = app(Arc::new(CannedLlm))
        .await
        .oneshot(chat_request(
            r#"{"question": "When was it built?", "chat_history": [["What is Alpha?", "A test project."]]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_null_history_is_treated_as_empty() {
    let response = app(Arc::new(CannedLlm))
        .await
        .oneshot(chat_request(
            r#"{"question": "What is Alpha?", "chat_history": null}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["source_documents"][0]["title"], "Alpha");
}

#[tokio::test]
async fn test_empty_question_is_answered() {
    let response = app(Arc::new(CannedLlm))
        .await
        .oneshot(chat_request(r#"{"question": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["source_documents"].is_array());
}

#[tokio::test]
async fn test_embedding_failure_is_500_with_detail() {
    let embedder = Arc::new(FlakyEmbedder::new());
    let router = app_with(
        embedder.clone(),
        Arc::new(CannedLlm),
        Duration::from_secs(10),
    )
    .await;
    embedder.arm();

    let response = router
        .oneshot(chat_request(r#"{"question": "Tell me about Alpha"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["kind"], "upstream");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("embedding service unreachable"));
}

#[tokio::test]
async fn test_generation_failure_is_500_with_detail() {
    let response = app(Arc::new(BrokenLlm))
        .await
        .oneshot(chat_request(r#"{"question": "Tell me about Alpha"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_request_timeout_is_500() {
    let router = app_with(
        Arc::new(HashingProvider::new(128)),
        Arc::new(StalledLlm),
        Duration::from_millis(50),
    )
    .await;

    let response = router
        .oneshot(chat_request(r#"{"question": "Tell me about Alpha"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("Timed out"));
}

#[tokio::test]
async fn test_missing_question_is_422() {
    let response = app(Arc::new(CannedLlm))
        .await
        .oneshot(chat_request(r#"{"chat_history": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["kind"], "client");
    assert!(body["detail"].as_str().unwrap().contains("question"));
}

#[tokio::test]
async fn test_invalid_json_is_400() {
    let response = app(Arc::new(CannedLlm))
        .await
        .oneshot(chat_request("{ not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/chat")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::new(CannedLlm)).await.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_does_not_echo_other_origins() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header(header::ORIGIN, "http://evil.example")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"question": "Alpha"}"#))
        .unwrap();

    let response = app(Arc::new(CannedLlm)).await.oneshot(request).await.unwrap();
    let allowed = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
    assert_eq!(allowed.map(|v| v.as_bytes()), Some(ORIGIN.as_bytes()));
    assert_ne!(allowed.map(|v| v.as_bytes()), Some("http://evil.example".as_bytes()));
}

#[tokio::test]
async fn test_health_reports_document_count() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::new(CannedLlm)).await.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(
        body,
        json!({"status": "ok", "documents": 1, "collection": "projects"})
    );
}
