//! Shared LLM service with two active profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Builds one HTTP client per profile at construction time.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::chat::{ChatCompletion, ChatMessage, ChatRequest};
//! use ai_llm_service::config::default_config::configs_from_env;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (chat, embedding) = configs_from_env()?;
//!     let svc = Arc::new(LlmServiceProfiles::new(chat, embedding)?);
//!
//!     let txt = svc.complete(&ChatRequest::new(vec![ChatMessage::user("Hello")])).await?;
//!     println!("CHAT: {}", txt);
//!
//!     let emb = svc.embed("Ferris").await?;
//!     println!("Embedding dim = {}", emb.len());
//!     Ok(())
//! }
//! ```

use tracing::info;

use crate::{
    chat::{BoxFuture, ChatCompletion, ChatRequest},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Provider-specific client bound to one profile.
enum ProviderClient {
    Ollama(OllamaService),
    OpenAi(OpenAiService),
}

impl ProviderClient {
    fn new(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        match cfg.provider {
            LlmProvider::Ollama => Ok(Self::Ollama(OllamaService::new(cfg.clone())?)),
            LlmProvider::OpenAI | LlmProvider::AzureOpenAI => {
                Ok(Self::OpenAi(OpenAiService::new(cfg.clone())?))
            }
        }
    }
}

/// Shared service that manages the **chat** and **embedding** profiles.
pub struct LlmServiceProfiles {
    chat: ProviderClient,
    embedding: ProviderClient,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if a provider client rejects its config.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        let chat_client = ProviderClient::new(&chat)?;
        let embedding_client = ProviderClient::new(&embedding)?;

        info!(
            chat_provider = ?chat.provider,
            chat_model = %chat.model,
            embedding_provider = ?embedding.provider,
            embedding_model = %embedding.model,
            "LLM profiles ready"
        );

        Ok(Self {
            chat: chat_client,
            embedding: embedding_client,
        })
    }

    /// Runs a chat completion with the **chat** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn chat(&self, req: &ChatRequest) -> Result<String, AiLlmError> {
        match &self.chat {
            ProviderClient::Ollama(cli) => cli.chat(req).await,
            ProviderClient::OpenAi(cli) => cli.generate(req).await,
        }
    }

    /// Computes embeddings using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding {
            ProviderClient::Ollama(cli) => cli.embeddings(input).await,
            ProviderClient::OpenAi(cli) => cli.embeddings(input).await,
        }
    }
}

impl ChatCompletion for LlmServiceProfiles {
    fn complete<'a>(&'a self, req: &'a ChatRequest) -> BoxFuture<'a, Result<String, AiLlmError>> {
        Box::pin(self.chat(req))
    }
}
