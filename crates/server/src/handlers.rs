//! Request handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use folio_core::AppError;
use folio_knowledge::{ChatQuery, ChatResult};
use serde::Serialize;
use std::sync::Arc;

/// `POST /api/chat`: answer a question from the project corpus.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatQuery>, JsonRejection>,
) -> Result<Json<ChatResult>, ApiError> {
    let Json(query) = payload?;

    tracing::info!(
        question_len = query.question.len(),
        history_turns = query.chat_history.len(),
        "Chat request"
    );

    let result = tokio::time::timeout(state.request_timeout, state.pipeline.ask(&query))
        .await
        .map_err(|_| {
            AppError::timeout("handling the chat request", state.request_timeout.as_secs())
        })??;

    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub documents: usize,
    pub collection: String,
}

/// `GET /health`: report the indexed document count.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let collection = state.pipeline.collection();
    let documents = state.pipeline.store().count(collection).await?;

    Ok(Json(HealthResponse {
        status: "ok",
        documents,
        collection: collection.to_string(),
    }))
}
