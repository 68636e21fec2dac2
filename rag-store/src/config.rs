//! Runtime configuration of the vector index connection.

use ai_llm_service::error_handler::{env_opt, env_opt_u64};

use crate::errors::RagError;

/// Which vector database backs the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorBackend {
    Qdrant,
    Pinecone,
}

impl std::str::FromStr for VectorBackend {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qdrant" => Ok(VectorBackend::Qdrant),
            "pinecone" => Ok(VectorBackend::Pinecone),
            other => Err(RagError::Config(format!("unsupported VECTOR_BACKEND: {other}"))),
        }
    }
}

/// Configuration for retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Selected backend.
    pub backend: VectorBackend,
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Pinecone index host, e.g. `https://sas-code-chunks-abc123.svc.pinecone.io`.
    pub pinecone_host: Option<String>,
    /// Pinecone API key.
    pub pinecone_api_key: Option<String>,
    /// Per-query timeout in seconds.
    pub timeout_secs: u64,
    /// Expected embedding dimension; checked after each embedding call when set.
    pub embedding_dim: Option<usize>,
}

impl RagConfig {
    /// Creates a sane default Qdrant config for a given collection name and endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            backend: VectorBackend::Qdrant,
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            exact_search: false,
            pinecone_host: None,
            pinecone_api_key: None,
            timeout_secs: 30,
            embedding_dim: None,
        }
    }

    /// Builds the config from environment variables.
    ///
    /// `VECTOR_BACKEND` (`qdrant`), `QDRANT_URL`, `QDRANT_API_KEY`,
    /// `QDRANT_COLLECTION`, `RAG_EXACT_SEARCH`, `PINECONE_INDEX_HOST`,
    /// `PINECONE_API_KEY`, `VECTOR_TIMEOUT_SECS`, `EMBEDDING_DIM`.
    ///
    /// # Errors
    /// Unknown backend, malformed numbers, or a config that fails [`RagConfig::validate`].
    pub fn from_env() -> Result<Self, RagError> {
        let backend = env_opt("VECTOR_BACKEND")
            .unwrap_or_else(|| "qdrant".to_string())
            .parse()?;

        let timeout_secs = env_opt_u64("VECTOR_TIMEOUT_SECS")
            .map_err(|e| RagError::Config(e.to_string()))?
            .unwrap_or(30);
        let embedding_dim = env_opt_u64("EMBEDDING_DIM")
            .map_err(|e| RagError::Config(e.to_string()))?
            .map(|d| d as usize);

        let cfg = Self {
            backend,
            qdrant_url: env_opt("QDRANT_URL").unwrap_or_else(|| "http://127.0.0.1:6334".into()),
            qdrant_api_key: env_opt("QDRANT_API_KEY"),
            collection: env_opt("QDRANT_COLLECTION").unwrap_or_else(|| "code_chunks".into()),
            exact_search: env_opt("RAG_EXACT_SEARCH").is_some_and(|v| v == "true"),
            pinecone_host: env_opt("PINECONE_INDEX_HOST"),
            pinecone_api_key: env_opt("PINECONE_API_KEY"),
            timeout_secs,
            embedding_dim,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values for the selected backend.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.timeout_secs == 0 {
            return Err(RagError::Config("timeout_secs must be > 0".into()));
        }
        match self.backend {
            VectorBackend::Qdrant => {
                if self.qdrant_url.trim().is_empty() {
                    return Err(RagError::Config("qdrant_url is empty".into()));
                }
                if self.collection.trim().is_empty() {
                    return Err(RagError::Config("collection is empty".into()));
                }
            }
            VectorBackend::Pinecone => {
                let host = self.pinecone_host.as_deref().unwrap_or("");
                if !(host.starts_with("http://") || host.starts_with("https://")) {
                    return Err(RagError::Config(
                        "PINECONE_INDEX_HOST must start with http:// or https://".into(),
                    ));
                }
                if self.pinecone_api_key.is_none() {
                    return Err(RagError::Config("PINECONE_API_KEY is required".into()));
                }
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
