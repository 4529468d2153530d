//! Error types for the Folio backend.
//!
//! This module defines a unified error enum covering every failure category
//! in the service: configuration, corpus loading, the three upstream
//! services (embeddings, vector store, language model), prompt rendering and
//! caller input.

use thiserror::Error;

/// Unified error type for the Folio backend.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus file missing or malformed
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Embedding service errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector store errors
    #[error("Vector store error: {0}")]
    Store(String),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// An outbound call exceeded its deadline
    #[error("Timed out after {seconds}s while {stage}")]
    Timeout { stage: String, seconds: u64 },

    /// Caller supplied something we cannot work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`AppError`].
///
/// Used at the HTTP boundary to choose a status code, and in logs to tell
/// whose fault a failure was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something invalid.
    Client,
    /// An external service (embeddings, store, LLM) failed or timed out.
    Upstream,
    /// The process is misconfigured.
    Config,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Stable lowercase name, used in response bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Upstream => "upstream",
            Self::Config => "config",
            Self::Internal => "internal",
        }
    }
}

impl AppError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) => ErrorKind::Client,
            AppError::Embedding(_)
            | AppError::Store(_)
            | AppError::Llm(_)
            | AppError::Timeout { .. } => ErrorKind::Upstream,
            AppError::Config(_) | AppError::Corpus(_) => ErrorKind::Config,
            AppError::Io(_)
            | AppError::Prompt(_)
            | AppError::Serialization(_)
            | AppError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Build a timeout error for the named pipeline stage.
    pub fn timeout(stage: impl Into<String>, seconds: u64) -> Self {
        AppError::Timeout {
            stage: stage.into(),
            seconds,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_errors_are_classified() {
        assert_eq!(AppError::Embedding("x".into()).kind(), ErrorKind::Upstream);
        assert_eq!(AppError::Store("x".into()).kind(), ErrorKind::Upstream);
        assert_eq!(AppError::Llm("x".into()).kind(), ErrorKind::Upstream);
        assert_eq!(AppError::timeout("embedding", 5).kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_client_and_config_kinds() {
        assert_eq!(
            AppError::InvalidInput("bad".into()).kind(),
            ErrorKind::Client
        );
        assert_eq!(AppError::Config("bad".into()).kind(), ErrorKind::Config);
        assert_eq!(AppError::Corpus("bad".into()).kind(), ErrorKind::Config);
        assert_eq!(AppError::Other("bad".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_timeout_message() {
        let err = AppError::timeout("generating answer", 30);
        assert_eq!(
            err.to_string(),
            "Timed out after 30s while generating answer"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err: AppError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
