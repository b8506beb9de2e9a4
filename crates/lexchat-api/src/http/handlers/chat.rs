//! Chat turn endpoints.
//!
//! - `POST /api/chat` answers with `{"content": "..."}` once the sanitized
//!   reply has been stored.
//! - `POST /api/chat/stream` answers with the raw reply text as a chunked
//!   `text/plain` body, forwarded fragment by fragment. The stored copy is
//!   the sanitized text, written once the stream has been drained.
//!
//! Both take `{"message": "..."}`.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use lexchat_core::chat::service::{DeliveryMode, Reply};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::state::AppState;

/// Request body for both chat endpoints.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Authenticated(owner): Authenticated,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    match state
        .chat_service
        .reply(owner, &body.message, DeliveryMode::Buffered)
        .await?
    {
        Reply::Complete(content) => Ok(Json(ChatResponse { content })),
        Reply::Streaming(_) => Err(AppError::Internal(
            "buffered profile produced a streaming reply".to_string(),
        )),
    }
}

/// POST /api/chat/stream
///
/// Errors before the first fragment come back as a normal JSON error. A
/// failure after that aborts the body mid-transfer.
pub async fn stream_chat(
    State(state): State<AppState>,
    Authenticated(owner): Authenticated,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let body = match state
        .chat_service
        .reply(owner, &body.message, DeliveryMode::Streaming)
        .await?
    {
        Reply::Streaming(fragments) => Body::from_stream(fragments),
        Reply::Complete(content) => Body::from(content),
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response())
}
