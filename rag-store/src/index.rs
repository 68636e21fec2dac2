//! Nearest-neighbour search seam.

use ai_llm_service::chat::BoxFuture;

use crate::errors::RagError;

/// One match returned by a vector index: similarity score and payload.
pub type ScoredPayload = (f32, serde_json::Value);

/// Read-only access to a vector index.
///
/// Implementations return at most `top_k` matches ordered by descending
/// similarity, with payloads attached when `with_payload` is set.
pub trait VectorIndex: Send + Sync {
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        with_payload: bool,
    ) -> BoxFuture<'a, Result<Vec<ScoredPayload>, RagError>>;
}
