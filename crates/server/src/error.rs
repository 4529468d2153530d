//! HTTP error responses.
//!
//! Every failure leaving a handler becomes a JSON body
//! `{"detail": ..., "kind": ...}` with a status derived from the error kind.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::{AppError, ErrorKind};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Failure inside the application
    App(AppError),

    /// Request body could not be decoded
    Rejection(JsonRejection),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejection(rejection)
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Client => StatusCode::BAD_REQUEST,
        ErrorKind::Upstream | ErrorKind::Config | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, detail) = match self {
            ApiError::App(err) => {
                let kind = err.kind();
                tracing::error!(kind = kind.as_str(), "Request failed: {}", err);
                let detail = match kind {
                    ErrorKind::Internal => "Internal server error".to_string(),
                    _ => err.to_string(),
                };
                (status_for(kind), kind, detail)
            }
            ApiError::Rejection(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                (rejection.status(), ErrorKind::Client, rejection.body_text())
            }
        };

        let body = Json(json!({ "detail": detail, "kind": kind.as_str() }));
        (status, body).into_response()
    }
}
