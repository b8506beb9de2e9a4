//! LlmProvider trait definition.
//!
//! The narrow seam between prompt assembly and whatever chat-completion
//! endpoint answers it. `complete` uses RPITIT; `stream` returns a boxed
//! stream so the trait can be wrapped by `BoxLlmProvider`.

use std::pin::Pin;

use futures_util::Stream;

use lexchat_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

/// Trait for chat-completion backends (DeepSeek, LM Studio, ...).
///
/// Implementations live in lexchat-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "deepseek", "lmstudio").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// A well-behaved implementation yields `StreamEvent::Connected` once
    /// the endpoint has accepted the request, before any text.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;
}
