//! Typed error for the contextor crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// The question was empty or whitespace only.
    #[error("query must not be empty")]
    EmptyQuery,

    /// A match from the index lacks a required metadata field.
    ///
    /// The index was built inconsistently; the whole request fails.
    #[error("data integrity error: match #{rank} has no string `{field}` in its metadata")]
    MissingField { rank: usize, field: &'static str },

    /// Invalid pipeline configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors from the embedding service or the vector index.
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),

    /// Errors from the generation service.
    #[error("LLM error: {0}")]
    Llm(#[from] AiLlmError),
}

impl ContextorError {
    /// `true` when an external call ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            ContextorError::Rag(e) => e.is_timeout(),
            ContextorError::Llm(e) => e.is_timeout(),
            _ => false,
        }
    }
}
