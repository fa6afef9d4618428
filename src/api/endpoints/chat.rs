//! Chat endpoint — conversational variant over session history.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::chat;
use crate::session::Role;

#[derive(Deserialize)]
pub struct ChatSendRequest {
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatReplyResponse {
    pub session_id: String,
    pub reply: String,
    pub model: String,
}

/// `POST /chat` — send a message within a session.
///
/// Builds a conversational prompt from the session's bounded history,
/// invokes the model with the same retry policy as grading, and appends
/// both turns on success.
pub async fn send(
    State(ctx): State<ApiContext>,
    Json(request): Json<ChatSendRequest>,
) -> Result<Json<ChatReplyResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message cannot be empty".into()));
    }
    if message.len() > 2000 {
        return Err(ApiError::BadRequest(
            "message too long (max 2000 chars)".into(),
        ));
    }

    let session_id = request
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let history = ctx.sessions.history(&session_id);
    let prompt = chat::build_chat_prompt(&history, message);
    let reply = ctx
        .grader
        .generate_reply(chat::CHAT_SYSTEM_PROMPT, &prompt)
        .await?;

    ctx.sessions.append(&session_id, Role::Student, message);
    ctx.sessions.append(&session_id, Role::Assistant, &reply);

    Ok(Json(ChatReplyResponse {
        session_id,
        reply,
        model: ctx.grader.model().to_string(),
    }))
}
