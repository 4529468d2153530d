//! LLM integration crate for the Folio backend.
//!
//! This crate provides a provider-agnostic abstraction over chat completion
//! services. The answer generator only ever sees the [`LlmClient`] trait.
//!
//! # Providers
//! - **OpenAI** (and OpenAI-compatible endpoints): default
//! - **Ollama**: local runtime
//!
//! # Example
//! ```no_run
//! use folio_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new("http://localhost:11434", Duration::from_secs(30))?;
//! let request = LlmRequest::new("Hello, world!", "llama3.2").with_temperature(0.7);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
pub use types::ProviderType;
