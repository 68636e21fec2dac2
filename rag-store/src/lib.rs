//! High-level retrieval facade over a pre-built vector index.
//!
//! This crate provides a clean API to:
//! - Connect to a Qdrant collection or a Pinecone index (read-only)
//! - Retrieve top‑K payloads (RAG) for a textual query
//!
//! The design is flat (no deep nesting) and splits responsibilities into focused modules.

mod config;
mod errors;
mod index;
mod pinecone;
mod qdrant_facade;
mod record;
mod retrieve;

pub mod embed;

pub use config::{RagConfig, VectorBackend};
pub use embed::{EmbeddingsProvider, llm::LlmEmbedder};
pub use errors::RagError;
pub use index::{ScoredPayload, VectorIndex};
pub use pinecone::PineconeIndex;
pub use qdrant_facade::QdrantFacade;
pub use record::{RagHit, RagQuery};

use std::sync::Arc;

use tracing::{info, trace};

/// High-level facade that wires configuration and the index client.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    index: Arc<dyn VectorIndex>,
}

impl RagStore {
    /// Constructs a new store for the backend selected in `cfg`.
    ///
    /// # Errors
    /// Returns `RagError::Config` if the client initialization fails.
    pub fn new(cfg: RagConfig) -> Result<Self, RagError> {
        info!(backend = ?cfg.backend, collection = %cfg.collection, "RagStore::new");
        let index: Arc<dyn VectorIndex> = match cfg.backend {
            VectorBackend::Qdrant => Arc::new(QdrantFacade::new(&cfg)?),
            VectorBackend::Pinecone => Arc::new(PineconeIndex::new(&cfg)?),
        };
        Ok(Self { index })
    }

    /// Wraps an already constructed index (custom backends, fakes in tests).
    pub fn with_index(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }

    /// Builds RAG context for a textual query using the provided embedding provider.
    ///
    /// # Errors
    /// Returns embedding errors or index failures.
    pub async fn rag_context(
        &self,
        query: RagQuery<'_>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<RagHit>, RagError> {
        trace!("RagStore::rag_context top_k={}", query.top_k);
        retrieve::rag_context(self.index.as_ref(), query, provider).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ai_llm_service::chat::BoxFuture;
    use serde_json::json;

    use super::*;

    struct FixedEmbedder;

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
            Box::pin(async { Ok(vec![1.0, 0.0]) })
        }
    }

    /// Returns every canned hit regardless of `top_k` and records the request.
    struct GreedyIndex {
        hits: Vec<ScoredPayload>,
        seen: Mutex<Vec<(Vec<f32>, u64, bool)>>,
    }

    impl VectorIndex for GreedyIndex {
        fn search<'a>(
            &'a self,
            vector: Vec<f32>,
            top_k: u64,
            with_payload: bool,
        ) -> BoxFuture<'a, Result<Vec<ScoredPayload>, RagError>> {
            self.seen.lock().unwrap().push((vector, top_k, with_payload));
            let hits = self.hits.clone();
            Box::pin(async move { Ok(hits) })
        }
    }

    #[tokio::test]
    async fn rag_context_embeds_once_and_caps_at_top_k() {
        let index = Arc::new(GreedyIndex {
            hits: vec![
                (0.9, json!({"name": "a"})),
                (0.8, json!({"name": "b"})),
                (0.7, json!({"name": "c"})),
            ],
            seen: Mutex::new(Vec::new()),
        });
        let store = RagStore::with_index(index.clone());

        let hits = store
            .rag_context(RagQuery { text: "q", top_k: 2 }, &FixedEmbedder)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].payload["name"], json!("a"));
        assert_eq!(hits[1].payload["name"], json!("b"));

        let seen = index.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(vec![1.0, 0.0], 2, true)]);
    }
}
