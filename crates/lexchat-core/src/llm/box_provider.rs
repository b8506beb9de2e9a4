//! Type-erased [`LlmProvider`].
//!
//! `LlmProvider::complete` returns `impl Future`, which keeps the trait out
//! of `dyn`. A private mirror trait with boxed futures is implemented for
//! every provider, and [`BoxLlmProvider`] holds that mirror behind a box.

use std::future::Future;
use std::pin::Pin;

use futures_util::Stream;

use lexchat_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

use super::provider::LlmProvider;

/// Boxed event stream returned by providers.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

trait ErasedProvider: Send + Sync {
    fn erased_name(&self) -> &str;
    fn erased_complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
    fn erased_stream(&self, request: CompletionRequest) -> EventStream;
}

impl<T: LlmProvider> ErasedProvider for T {
    fn erased_name(&self) -> &str {
        self.name()
    }

    fn erased_complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.complete(request))
    }

    fn erased_stream(&self, request: CompletionRequest) -> EventStream {
        self.stream(request)
    }
}

/// The configured completion endpoint, chosen at startup.
pub struct BoxLlmProvider {
    inner: Box<dyn ErasedProvider>,
}

impl BoxLlmProvider {
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.erased_name()
    }

    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner.erased_complete(request).await
    }

    pub fn stream(&self, request: CompletionRequest) -> EventStream {
        self.inner.erased_stream(request)
    }
}

impl std::fmt::Debug for BoxLlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BoxLlmProvider").field(&self.name()).finish()
    }
}
