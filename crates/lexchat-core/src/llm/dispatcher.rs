//! CompletionDispatcher -- sends an assembled prompt to the provider.
//!
//! The generation profile decides the delivery mode: buffered dispatch makes
//! one request and returns the first choice's text; streaming dispatch opens
//! the upstream stream, waits for the connection event, and hands back a
//! lazy sequence of text fragments. Nothing here retries.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use tracing::{Instrument, debug, info_span};

use lexchat_types::config::GenerationConfig;
use lexchat_types::llm::{CompletionRequest, LlmError, Message, StreamEvent};

use super::box_provider::{BoxLlmProvider, EventStream};

/// Lazy, finite, non-restartable sequence of reply fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send + 'static>>;

/// Outcome of a dispatch, one variant per delivery mode.
pub enum Dispatched {
    /// The whole reply text, unsanitized.
    Complete(String),
    /// Fragments in emission order, unsanitized.
    Streaming(FragmentStream),
}

impl std::fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatched::Complete(text) => f.debug_tuple("Complete").field(text).finish(),
            Dispatched::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

/// Dispatches prompts to a single configured provider.
#[derive(Clone)]
pub struct CompletionDispatcher {
    provider: Arc<BoxLlmProvider>,
}

impl CompletionDispatcher {
    pub fn new(provider: Arc<BoxLlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send `messages` with the parameters in `config`; `config.stream`
    /// selects the mode.
    pub async fn dispatch(
        &self,
        messages: Vec<Message>,
        config: &GenerationConfig,
    ) -> Result<Dispatched, LlmError> {
        let request = build_request(messages, config);
        if request.stream {
            self.complete_streaming(request).await.map(Dispatched::Streaming)
        } else {
            self.complete_once(request).await.map(Dispatched::Complete)
        }
    }

    async fn complete_once(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = %request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.stream = false,
            gen_ai.request.messages = request.messages.len(),
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        debug!(
            stop_reason = %response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Buffered completion received"
        );
        Ok(response.content)
    }

    async fn complete_streaming(
        &self,
        request: CompletionRequest,
    ) -> Result<FragmentStream, LlmError> {
        let span = info_span!(
            "gen_ai.stream",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = %request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.stream = true,
            gen_ai.request.messages = request.messages.len(),
        );

        let mut events = StreamInSpan {
            inner: self.provider.stream(request),
            span,
        };

        // Hold delivery until the endpoint has accepted the request, so a
        // refused connection is an upstream error with nothing sent yet.
        let pending = match events.next().await {
            Some(Ok(StreamEvent::Connected)) => None,
            Some(Ok(event)) => Some(event),
            Some(Err(e)) => return Err(e),
            None => {
                return Err(LlmError::Stream(
                    "stream closed before connecting".to_string(),
                ));
            }
        };

        let fragments = async_stream::stream! {
            let mut next = pending;
            loop {
                let event = match next.take() {
                    Some(event) => event,
                    None => match events.next().await {
                        Some(Ok(event)) => event,
                        Some(Err(e)) => {
                            yield Err(e);
                            break;
                        }
                        None => break,
                    },
                };
                match event {
                    StreamEvent::TextDelta { text } => {
                        if !text.is_empty() {
                            yield Ok(text);
                        }
                    }
                    StreamEvent::MessageDelta { stop_reason } => {
                        debug!(%stop_reason, "Upstream stream finishing");
                    }
                    StreamEvent::Usage(usage) => {
                        debug!(
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "Upstream usage reported"
                        );
                    }
                    StreamEvent::Done => break,
                    StreamEvent::Connected => {}
                }
            }
        };

        Ok(Box::pin(fragments))
    }
}

/// Copy the generation profile onto a request, unmodified.
pub fn build_request(messages: Vec<Message>, config: &GenerationConfig) -> CompletionRequest {
    CompletionRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens,
        temperature: Some(config.temperature),
        presence_penalty: Some(config.presence_penalty),
        frequency_penalty: Some(config.frequency_penalty),
        stream: config.stream,
    }
}

pin_project_lite::pin_project! {
    /// Keeps the dispatch span entered for every poll of the upstream stream.
    struct StreamInSpan {
        #[pin]
        inner: EventStream,
        span: tracing::Span,
    }
}

impl Stream for StreamInSpan {
    type Item = Result<StreamEvent, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let _enter = this.span.enter();
        this.inner.poll_next(cx)
    }
}
