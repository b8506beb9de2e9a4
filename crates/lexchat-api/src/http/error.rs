//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lexchat_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure of a chat turn or history read.
    Chat(ChatError),
    /// Malformed request.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Chat(ChatError::AuthRequired) => {
                (StatusCode::UNAUTHORIZED, "authentication required".to_string())
            }
            AppError::Chat(ChatError::InvalidRequest(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Upstream and storage detail stays in the logs.
            AppError::Chat(ChatError::Persistence(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to record the conversation".to_string(),
            ),
            AppError::Chat(ChatError::Upstream(_) | ChatError::StreamInterrupted(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to process the request".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if let AppError::Internal(detail) = &self {
            tracing::error!(%detail, "Internal error");
        } else if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(%status, %message, "Request rejected");
        }

        let body = json!({ "error": message });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
