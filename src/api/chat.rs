//! Chat endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{api::error::ApiError, chat::AppState};

pub const MAX_MESSAGE_CHARS: u64 = 1000;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(max = MAX_MESSAGE_CHARS))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let reply = state.pipeline.reply(&request.message).await;
    tracing::info!(kind = ?reply.kind, "chat reply");
    Ok(Json(ChatResponse { reply: reply.text }))
}
