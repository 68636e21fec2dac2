//! POST /chat: chat-widget surface: message in, display text out.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::instrument;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:7860/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"How is ADSL built?","history":[]}'
/// ```
#[instrument(skip_all)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;
    let answer = state
        .contextor
        .respond(&body.message, &body.history)
        .await?;
    Ok(Json(ChatResponse { answer }))
}
