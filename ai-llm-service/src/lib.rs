//! Shared LLM access for the workspace: chat and embedding clients for
//! Ollama, OpenAI and Azure OpenAI behind one profile-based service.

pub mod chat;
pub mod error_handler;
pub mod service_profiles;
pub mod telemetry;

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
    pub mod llm_provider;
}

pub mod services {
    pub mod ollama_service;
    pub mod open_ai_service;
}

pub use chat::{ChatCompletion, ChatMessage, ChatRequest, Role};
pub use error_handler::AiLlmError;
pub use service_profiles::LlmServiceProfiles;
