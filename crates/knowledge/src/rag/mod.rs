//! Retrieval-augmented answering.
//!
//! Embeds a question, retrieves the nearest projects, renders them into the
//! grounding prompt and asks the chat model for an answer.

pub mod ask;
pub mod types;

pub use ask::{PipelineOptions, RagPipeline, StageTimeouts};
pub use types::{ChatQuery, ChatResult, ChatStage, SourceDocument};
