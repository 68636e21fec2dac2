use ai_llm_service::ChatMessage;
use serde::{Deserialize, Serialize};

/// Request payload for /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's latest message.
    pub message: String,
    /// Earlier turns as `{role, content}`; accepted but not used for retrieval.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Response payload for /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Model answer followed by the retrieved-chunks list.
    pub answer: String,
}
