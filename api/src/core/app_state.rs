use std::sync::Arc;

use ai_llm_service::{LlmServiceProfiles, config::default_config::configs_from_env};
use contextor::Contextor;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Question-answering pipeline, shared by every request.
    pub contextor: Arc<Contextor>,
}

impl AppState {
    pub fn new(contextor: Arc<Contextor>) -> Self {
        Self { contextor }
    }

    /// Load shared state from environment variables.
    ///
    /// # Errors
    /// `AppError::Config` when LLM, vector index or pipeline settings are
    /// missing or invalid.
    pub fn from_env() -> Result<Self, AppError> {
        let (chat, embedding) = configs_from_env().map_err(AppError::config)?;
        let svc = Arc::new(LlmServiceProfiles::new(chat, embedding).map_err(AppError::config)?);
        let contextor = Contextor::from_env(svc).map_err(AppError::config)?;
        Ok(Self::new(Arc::new(contextor)))
    }
}
