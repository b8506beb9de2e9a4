use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in lexchat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Failure taxonomy of a chat request.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No identity, or an identity the gate rejected.
    #[error("authentication required")]
    AuthRequired,

    /// The caller sent something we refuse before doing any work.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The history store failed to record a message.
    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    /// The completion endpoint failed or answered with something unusable.
    #[error("upstream error: {0}")]
    Upstream(#[from] LlmError),

    /// A streamed completion broke off after delivery had started.
    #[error("stream interrupted: {0}")]
    StreamInterrupted(LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_from_repository() {
        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(err, ChatError::Persistence(_)));
        assert_eq!(err.to_string(), "persistence error: database connection error");
    }

    #[test]
    fn test_chat_error_from_llm() {
        let err: ChatError = LlmError::EmptyResponse.into();
        assert!(matches!(err, ChatError::Upstream(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_stream_interrupted_display() {
        let err = ChatError::StreamInterrupted(LlmError::Stream("reset".to_string()));
        assert_eq!(err.to_string(), "stream interrupted: stream error: reset");
    }
}
