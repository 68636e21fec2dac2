//! HTTP boundary for the code Q&A pipeline.
//!
//! Routes:
//! - `GET /health`
//! - `POST /chat` for chat widgets (answer text with citations appended)
//! - `POST /ask` for structured clients

use std::{env, sync::Arc};

pub mod core {
    pub mod app_state;
}
pub mod error_handler;

mod routes {
    pub mod health_route;

    pub mod ask {
        pub mod ask_question_route;
        pub mod ask_request;
    }

    pub mod chat {
        pub mod chat_request;
        pub mod chat_route;
    }
}

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    routes::{ask::ask_question_route::ask_question, chat::chat_route::chat, health_route::health},
};

const DEFAULT_ADDRESS: &str = "0.0.0.0:7860";
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Loads state from the environment and serves until Ctrl+C.
///
/// # Errors
/// `Config` for invalid settings, `Bind`/`Server` for socket failures.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());
    let state = Arc::new(AppState::from_env()?);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!("API listening on http://{host_url}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("API stopped");
    Ok(())
}

/// All routes bound to `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/ask", post(ask_question))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use ai_llm_service::{AiLlmError, ChatCompletion, ChatRequest, chat::BoxFuture};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use contextor::{Contextor, ContextorConfig};
    use http_body_util::BodyExt;
    use rag_store::{EmbeddingsProvider, RagError, RagStore, ScoredPayload, VectorIndex};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    struct OneHitIndex(Vec<ScoredPayload>);

    impl VectorIndex for OneHitIndex {
        fn search<'a>(
            &'a self,
            _vector: Vec<f32>,
            _top_k: u64,
            _with_payload: bool,
        ) -> BoxFuture<'a, Result<Vec<ScoredPayload>, RagError>> {
            let hits = self.0.clone();
            Box::pin(async move { Ok(hits) })
        }
    }

    struct UnitEmbedder;

    impl EmbeddingsProvider for UnitEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
            Box::pin(async { Ok(vec![1.0]) })
        }
    }

    struct CannedChat;

    impl ChatCompletion for CannedChat {
        fn complete<'a>(
            &'a self,
            _req: &'a ChatRequest,
        ) -> BoxFuture<'a, Result<String, AiLlmError>> {
            Box::pin(async { Ok("Sort both datasets, then MERGE.".to_string()) })
        }
    }

    fn app(hits: Vec<ScoredPayload>) -> Router {
        let contextor = Contextor::new(
            &ContextorConfig::default(),
            Arc::new(RagStore::with_index(Arc::new(OneHitIndex(hits)))),
            Arc::new(UnitEmbedder),
            Arc::new(CannedChat),
        );
        router(Arc::new(AppState::new(Arc::new(contextor))))
    }

    fn merge_hit() -> ScoredPayload {
        (
            0.87,
            json!({
                "chunk_type": "macro",
                "name": "merge_dm",
                "code": "%macro merge_dm; %mend;",
                "explanation": "Merges DM with SUPPDM.",
                "filename": "merge_dm.sas",
                "line_start": 1,
                "line_end": 20
            }),
        )
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let resp = app(vec![])
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn chat_returns_answer_with_citations() {
        let resp = app(vec![merge_hit()])
            .oneshot(post_json(
                "/chat",
                r#"{"message":"How do I merge DM?","history":[{"role":"user","content":"hi"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        let answer = body["answer"].as_str().unwrap();
        assert!(answer.starts_with("Sort both datasets, then MERGE."));
        assert!(answer.ends_with(
            "- macro: `merge_dm` (score: 0.870) 📁 merge_dm.sas (Lines 1-20)\n"
        ));
    }

    #[tokio::test]
    async fn ask_returns_structured_citations() {
        let resp = app(vec![merge_hit()])
            .oneshot(post_json("/ask", r#"{"question":"merge?","top_k":2}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["body"], "Sort both datasets, then MERGE.");
        assert_eq!(body["citations"][0]["name"], "merge_dm");
        assert_eq!(body["citations"][0]["rank"], 1);
        assert_eq!(body["citations"][0]["file_status"], "not_recorded");
    }

    #[tokio::test]
    async fn blank_question_is_bad_request() {
        let resp = app(vec![])
            .oneshot(post_json("/ask", r#"{"question":"  "}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let resp = app(vec![])
            .oneshot(post_json("/chat", r#"{"msg":"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn broken_index_metadata_is_server_error() {
        let resp = app(vec![(0.5, json!({"name": "orphan"}))])
            .oneshot(post_json("/chat", r#"{"message":"q"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(resp).await["error"], "INDEX_INTEGRITY");
    }
}
