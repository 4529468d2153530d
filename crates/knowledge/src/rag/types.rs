//! Chat request and response types.

use crate::types::RetrievedDocument;
use folio_prompt::HistoryTurn;
use serde::{Deserialize, Deserializer, Serialize};

/// A question from the caller, with optional earlier turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatQuery {
    pub question: String,

    /// Earlier `(question, answer)` pairs, oldest first. Absent or `null`
    /// means no history.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chat_history: Vec<(String, String)>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<(String, String)>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatQuery {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            chat_history: Vec::new(),
        }
    }

    pub(crate) fn history_turns(&self) -> Vec<HistoryTurn> {
        self.chat_history.iter().cloned().map(HistoryTurn::from).collect()
    }
}

/// One retrieved project as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub title: String,
    pub description: String,
    pub timeline: String,
    pub tags: Vec<String>,

    /// The projection that was embedded and shown to the model
    pub text: String,

    /// Similarity to the question
    pub score: f32,
}

impl From<RetrievedDocument> for SourceDocument {
    fn from(doc: RetrievedDocument) -> Self {
        Self {
            title: doc.metadata.title,
            description: doc.metadata.description,
            timeline: doc.metadata.timeline,
            tags: doc.metadata.tags,
            text: doc.text,
            score: doc.score,
        }
    }
}

/// Answer plus the documents it was grounded on, in retrieval order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResult {
    pub answer: String,
    pub source_documents: Vec<SourceDocument>,
}

/// Steps a chat request passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStage {
    Received,
    Embedded,
    Retrieved,
    PromptBuilt,
    Answered,
}

impl ChatStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Embedded => "embedded",
            Self::Retrieved => "retrieved",
            Self::PromptBuilt => "prompt_built",
            Self::Answered => "answered",
        }
    }
}
