//! Prompt types for the Folio backend.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};

/// A prompt definition, either built in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Optional system message template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// User message template with Handlebars syntax.
    ///
    /// Available variables: `question`, `context`, `history`
    /// (a list of `{question, answer}` turns).
    pub template: String,
}

/// One earlier exchange supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub question: String,
    pub answer: String,
}

impl From<(String, String)> for HistoryTurn {
    fn from((question, answer): (String, String)) -> Self {
        Self { question, answer }
    }
}

/// Values substituted into a prompt template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptVariables {
    /// The user's question, verbatim
    pub question: String,

    /// Retrieved documents, already projected and joined
    pub context: String,

    /// Earlier turns, oldest first
    pub history: Vec<HistoryTurn>,
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Number of earlier turns rendered into the prompt
    #[serde(rename = "historyTurns")]
    pub history_turns: usize,

    /// Size of the injected context in bytes
    #[serde(rename = "contextBytes")]
    pub context_bytes: usize,
}
