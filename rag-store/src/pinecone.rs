//! Pinecone data-plane client implementing [`VectorIndex`].
//!
//! Only the query endpoint is used:
//! `POST {host}/query` with header `Api-Key`, body
//! `{ vector, topK, includeMetadata, includeValues: false }`.

use std::time::{Duration, Instant};

use ai_llm_service::chat::BoxFuture;
use ai_llm_service::error_handler::make_snippet;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::RagConfig;
use crate::errors::RagError;
use crate::index::{ScoredPayload, VectorIndex};

/// Query client for one Pinecone index host.
pub struct PineconeIndex {
    client: reqwest::Client,
    url_query: String,
    timeout: Duration,
}

impl PineconeIndex {
    /// Builds the client from a validated Pinecone config.
    ///
    /// # Errors
    /// `RagError::Config` for a missing host/key, `RagError::Http` if the
    /// HTTP client cannot be built.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;
        let host = cfg
            .pinecone_host
            .as_deref()
            .ok_or_else(|| RagError::Config("PINECONE_INDEX_HOST is required".into()))?;
        let key = cfg
            .pinecone_api_key
            .as_deref()
            .ok_or_else(|| RagError::Config("PINECONE_API_KEY is required".into()))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Api-Key",
            reqwest::header::HeaderValue::from_str(key)
                .map_err(|e| RagError::Config(format!("invalid PINECONE_API_KEY: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url_query: format!("{}/query", host.trim_end_matches('/')),
            timeout: cfg.timeout(),
        })
    }

    /// Runs a nearest-neighbour query.
    pub async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        with_payload: bool,
    ) -> Result<Vec<ScoredPayload>, RagError> {
        let started = Instant::now();
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: with_payload,
            include_values: false,
        };

        debug!(top_k, "POST {}", self.url_query);
        let resp = self
            .client
            .post(&self.url_query)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(%status, url = %self.url_query, %snippet, "Pinecone query failed");
            return Err(RagError::PineconeStatus {
                status,
                url: self.url_query.clone(),
                snippet,
            });
        }

        // The client timeout also covers reading the body.
        let out: QueryResponse = resp.json().await.map_err(|e| self.transport_error(e))?;
        info!(
            hits = out.matches.len(),
            latency_ms = started.elapsed().as_millis(),
            "Pinecone query completed"
        );

        Ok(out
            .matches
            .into_iter()
            .map(|m| {
                let payload = m
                    .metadata
                    .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
                (m.score, payload)
            })
            .collect())
    }

    fn transport_error(&self, e: reqwest::Error) -> RagError {
        if e.is_timeout() {
            RagError::Timeout(self.timeout)
        } else {
            RagError::Http(e)
        }
    }
}

impl VectorIndex for PineconeIndex {
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        with_payload: bool,
    ) -> BoxFuture<'a, Result<Vec<ScoredPayload>, RagError>> {
        Box::pin(self.query(vector, top_k, with_payload))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: u64,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    score: f32,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}
