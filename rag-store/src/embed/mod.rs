use crate::errors::RagError;
use ai_llm_service::chat::BoxFuture;

/// Asynchronous embedding provider.
///
/// Implement this trait to plug in your own embedding backend (Ollama,
/// OpenAI, a fake in tests).
pub trait EmbeddingsProvider: Send + Sync {
    /// Produces an embedding vector for the given text.
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>>;
}

pub mod llm;
