//! Astra DB vector store over the JSON Data API.
//!
//! Every command is a `POST` of a single-key JSON object to
//! `{endpoint}/api/json/v1/{keyspace}` (keyspace commands) or
//! `{endpoint}/api/json/v1/{keyspace}/{collection}` (collection commands).
//! Failures come back as HTTP 200 with an `errors` array, so both the HTTP
//! status and the body are checked.

use crate::types::{IndexedDocument, ProjectRecord, RetrievedDocument};
use crate::vector_store::VectorStore;
use folio_core::{AppError, AppResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Astra DB Data API client.
#[derive(Debug)]
pub struct AstraStore {
    client: reqwest::Client,
    endpoint: String,
    keyspace: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    data: Option<FindData>,
    #[serde(default)]
    errors: Vec<CommandError>,
}

#[derive(Debug, Deserialize)]
struct CommandError {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "errorCode")]
    error_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FindData {
    #[serde(default)]
    documents: Vec<StoredDocument>,
}

#[derive(Debug, Deserialize)]
struct StoredDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    text: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    timeline: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(rename = "$similarity", default)]
    similarity: f32,
}

impl From<StoredDocument> for RetrievedDocument {
    fn from(doc: StoredDocument) -> Self {
        Self {
            id: doc.id,
            text: doc.text,
            metadata: ProjectRecord {
                title: doc.title,
                description: doc.description,
                timeline: doc.timeline,
                tags: doc.tags,
            },
            score: doc.similarity,
        }
    }
}

impl AstraStore {
    pub fn new(endpoint: &str, keyspace: &str, token: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Store(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            keyspace: keyspace.to_string(),
            token: token.to_string(),
        })
    }

    fn keyspace_url(&self) -> String {
        format!("{}/api/json/v1/{}", self.endpoint, self.keyspace)
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.keyspace_url(), collection)
    }

    async fn command(&self, url: &str, body: Value) -> AppResult<CommandResponse> {
        let response = self
            .client
            .post(url)
            .header("Token", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Astra request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(AppError::Store(format!("Astra returned {}: {}", status, text)));
        }

        let parsed: CommandResponse = response
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Failed to parse Astra response: {}", e)))?;

        if !parsed.errors.is_empty() {
            let messages: Vec<String> = parsed
                .errors
                .iter()
                .map(|e| match &e.error_code {
                    Some(code) => format!("{} ({})", e.message, code),
                    None => e.message.clone(),
                })
                .collect();
            return Err(AppError::Store(format!(
                "Astra command failed: {}",
                messages.join("; ")
            )));
        }

        Ok(parsed)
    }

    fn status_field(response: &CommandResponse, field: &str) -> Option<Value> {
        response.status.as_ref().and_then(|s| s.get(field)).cloned()
    }
}

#[async_trait::async_trait]
impl VectorStore for AstraStore {
    fn backend_name(&self) -> &str {
        "astra"
    }

    async fn create_collection(&self, collection: &str, dimension: usize) -> AppResult<()> {
        let body = json!({
            "createCollection": {
                "name": collection,
                "options": {
                    "vector": {"dimension": dimension, "metric": "cosine"}
                }
            }
        });
        self.command(&self.keyspace_url(), body).await?;
        tracing::debug!("Ensured Astra collection '{}' ({} dims)", collection, dimension);
        Ok(())
    }

    async fn upsert(&self, collection: &str, document: &IndexedDocument) -> AppResult<()> {
        let record = &document.metadata;
        let body = json!({
            "findOneAndReplace": {
                "filter": {"_id": document.id},
                "replacement": {
                    "_id": document.id,
                    "text": document.text,
                    "title": record.title,
                    "description": record.description,
                    "timeline": record.timeline,
                    "tags": record.tags,
                    "$vector": document.embedding,
                },
                "options": {"upsert": true}
            }
        });
        self.command(&self.collection_url(collection), body).await?;
        Ok(())
    }

    async fn query_nearest(
        &self,
        collection: &str,
        vector: &[f32],
        k: usize,
    ) -> AppResult<Vec<RetrievedDocument>> {
        let body = json!({
            "find": {
                "sort": {"$vector": vector},
                "projection": {"$vector": 0},
                "options": {"limit": k, "includeSimilarity": true}
            }
        });
        let response = self.command(&self.collection_url(collection), body).await?;

        let mut results: Vec<RetrievedDocument> = response
            .data
            .map(|d| d.documents)
            .unwrap_or_default()
            .into_iter()
            .map(RetrievedDocument::from)
            .collect();
        results.truncate(k);
        Ok(results)
    }

    async fn count(&self, collection: &str) -> AppResult<usize> {
        let body = json!({"countDocuments": {}});
        let response = self.command(&self.collection_url(collection), body).await?;

        Self::status_field(&response, "count")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .ok_or_else(|| AppError::Store("Astra count response missing status.count".to_string()))
    }

    async fn clear(&self, collection: &str) -> AppResult<()> {
        let url = self.collection_url(collection);
        loop {
            let response = self.command(&url, json!({"deleteMany": {}})).await?;
            let more = Self::status_field(&response, "moreData")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if !more {
                break;
            }
        }
        tracing::debug!("Cleared Astra collection '{}'", collection);
        Ok(())
    }
}
