//! Core data models used by the library.

use serde_json::Value;

/// Query parameters for RAG retrieval.
pub struct RagQuery<'a> {
    pub text: &'a str,
    pub top_k: u64,
}

/// A single retrieval hit: similarity score and the stored payload.
///
/// Hits are returned in the order given by the index (best first).
#[derive(Clone, Debug, PartialEq)]
pub struct RagHit {
    pub score: f32,
    pub payload: Value,
}
