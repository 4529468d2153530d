//! Embedding provider implementations.

pub mod hashing;
pub mod openai;

pub use hashing::HashingProvider;
pub use openai::OpenAiEmbeddingProvider;
