//! POST /ask: asks the LLM with RAG context and returns structured output.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use contextor::AskOptions;
use tracing::instrument;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:7860/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"Where is the DM merge macro?","top_k":5}'
/// ```
#[instrument(skip_all)]
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Json<AskResponse>> {
    let Json(body) = payload?;

    // Fallback to env when the client omits top_k
    let opts = AskOptions {
        top_k: body.top_k.unwrap_or(0),
    };

    let answer = state.contextor.ask(&body.question, opts).await?;
    let rendered = answer.render();

    Ok(Json(AskResponse {
        answer: rendered,
        body: answer.body,
        citations: answer.citations.into_iter().map(Into::into).collect(),
    }))
}
