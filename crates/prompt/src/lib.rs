//! Prompt system for the Folio backend.
//!
//! This crate provides:
//! - The built-in grounding prompt used by the chat endpoint
//! - YAML prompt definitions that can replace it
//! - Handlebars template rendering with question, context and history

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{default_prompt, load_or_default, load_prompt, DEFAULT_PROMPT_ID};
pub use types::{BuiltPrompt, BuiltPromptMetadata, HistoryTurn, PromptDefinition, PromptVariables};
