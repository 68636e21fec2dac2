//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind the
//! [`VectorIndex`] seam, hiding the verbose builder pattern and keeping the
//! rest of the application decoupled from `qdrant-client`.

use std::collections::HashMap;
use std::time::Duration;

use ai_llm_service::chat::BoxFuture;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{SearchParamsBuilder, SearchPointsBuilder, Value as QValue};
use tracing::{debug, info};

use crate::config::RagConfig;
use crate::errors::RagError;
use crate::index::{ScoredPayload, VectorIndex};

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    exact: bool,
    timeout: Duration,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Supports optional API key authentication; the configured timeout is
    /// applied both to the client and around every search call.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url).timeout(cfg.timeout());
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            exact: cfg.exact_search,
            timeout: cfg.timeout(),
        })
    }

    /// Performs a similarity search in Qdrant.
    ///
    /// Returns `(score, payload)` tuples with results sorted by score.
    pub async fn search_points(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        with_payload: bool,
    ) -> Result<Vec<ScoredPayload>, RagError> {
        info!(
            "Searching in '{}' with top_k={}, with_payload={}, exact={}",
            self.collection, top_k, with_payload, self.exact
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(with_payload);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = tokio::time::timeout(self.timeout, self.client.search_points(builder))
            .await
            .map_err(|_| RagError::Timeout(self.timeout))?
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let out: Vec<ScoredPayload> = res
            .result
            .into_iter()
            .map(|r| (r.score, qpayload_to_json(r.payload)))
            .collect();

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }
}

impl VectorIndex for QdrantFacade {
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        with_payload: bool,
    ) -> BoxFuture<'a, Result<Vec<ScoredPayload>, RagError>> {
        Box::pin(self.search_points(vector, top_k, with_payload))
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into a JSON object.
fn qpayload_to_json(p: HashMap<String, QValue>) -> serde_json::Value {
    let m = p
        .into_iter()
        .map(|(k, v)| (k, qvalue_to_json(v)))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(m)
}

fn qvalue_to_json(v: QValue) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => serde_json::Value::String(s),
        Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(K::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(K::StructValue(s)) => qpayload_to_json(s.fields),
        Some(K::NullValue(_)) | None => serde_json::Value::Null,
    }
}
