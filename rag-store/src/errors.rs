//! Unified error types for the crate.

use std::time::Duration;

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Embedding dimension differs from the configured one.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// The embedding service failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] AiLlmError),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Pinecone returned a non-success status.
    #[error("pinecone HTTP {status} from {url}: {snippet}")]
    PineconeStatus {
        status: reqwest::StatusCode,
        url: String,
        snippet: String,
    },

    /// Transport failure talking to an HTTP index.
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The index did not answer within the configured timeout.
    #[error("vector index timed out after {0:?}")]
    Timeout(Duration),
}

impl RagError {
    /// `true` when the failure is an expired timeout, either on the index or
    /// on the embedding call.
    pub fn is_timeout(&self) -> bool {
        match self {
            RagError::Timeout(_) => true,
            RagError::Embedding(e) => e.is_timeout(),
            _ => false,
        }
    }
}
