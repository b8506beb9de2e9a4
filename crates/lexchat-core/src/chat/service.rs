//! Chat service running one conversational turn end to end.
//!
//! A turn records the user message, picks an agent profile, assembles the
//! prompt from the recent history window, dispatches it, and relays the
//! reply. Buffered replies are sanitized and stored before they are
//! returned. Streamed replies are forwarded raw as they arrive while the
//! relay accumulates them, then the sanitized whole is stored once the
//! stream ends.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use lexchat_types::chat::{ChatMessage, MessageRole};
use lexchat_types::config::{ChatConfig, GenerationConfig, GenerationProfiles};
use lexchat_types::error::ChatError;
use lexchat_types::identity::OwnerId;
use lexchat_types::llm::{LlmError, Message};

use crate::agent::context::ContextAssembler;
use crate::agent::selector::AgentSelector;
use crate::chat::repository::HistoryStore;
use crate::llm::dispatcher::{CompletionDispatcher, Dispatched, FragmentStream};
use crate::sanitize::Sanitizer;

/// Raw reply fragments as delivered to the client.
///
/// An `Err` item is terminal: the stream broke off after delivery started.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send + 'static>>;

/// How the reply should reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Buffered,
    Streaming,
}

/// A turn's reply.
pub enum Reply {
    /// Sanitized text, already persisted.
    Complete(String),
    /// Raw fragments; persistence happens when the stream is drained.
    Streaming(ReplyStream),
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Complete(text) => f.debug_tuple("Complete").field(text).finish(),
            Reply::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

/// Orchestrates a chat turn over a `HistoryStore`.
///
/// Generic over the store so lexchat-core never depends on lexchat-infra.
pub struct ChatService<H: HistoryStore> {
    history: Arc<H>,
    dispatcher: CompletionDispatcher,
    selector: AgentSelector,
    assembler: ContextAssembler,
    sanitizer: Sanitizer,
    generation: GenerationProfiles,
}

impl<H: HistoryStore + 'static> ChatService<H> {
    /// Build the service from startup configuration.
    pub fn new(
        history: Arc<H>,
        dispatcher: CompletionDispatcher,
        chat: &ChatConfig,
        generation: GenerationProfiles,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            history,
            dispatcher,
            selector: AgentSelector::new()?,
            assembler: ContextAssembler::new(chat.history_window as usize),
            sanitizer: Sanitizer::new(chat.unterminated_think)?,
            generation: generation.normalized(),
        })
    }

    pub fn generation(&self, mode: DeliveryMode) -> &GenerationConfig {
        match mode {
            DeliveryMode::Buffered => &self.generation.buffered,
            DeliveryMode::Streaming => &self.generation.streaming,
        }
    }

    /// Run one turn for `owner`.
    ///
    /// Errors returned here happen before any reply text has been delivered.
    /// A failure to record the user message aborts before the endpoint is
    /// contacted.
    pub async fn reply(
        &self,
        owner: OwnerId,
        text: &str,
        mode: DeliveryMode,
    ) -> Result<Reply, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::InvalidRequest(
                "message must not be empty".to_string(),
            ));
        }

        let user_message = ChatMessage::new(owner, MessageRole::User, text);
        self.history.append(&user_message).await?;

        let profile = self.selector.select(text);
        let window = self.read_window(&owner, user_message.id).await;
        let messages = self.assembler.assemble(&window, text, profile);

        info!(
            owner = %owner,
            agent = %profile.kind,
            history = window.len(),
            prompt_messages = messages.len(),
            mode = ?mode,
            provider = self.dispatcher.provider_name(),
            "Dispatching chat turn"
        );

        match self.dispatcher.dispatch(messages, self.generation(mode)).await {
            Ok(Dispatched::Complete(raw)) => self.finish_buffered(owner, &raw).await.map(Reply::Complete),
            Ok(Dispatched::Streaming(fragments)) => Ok(Reply::Streaming(self.relay(owner, fragments))),
            Err(e) => {
                error!(owner = %owner, error = %e, "Completion request failed");
                Err(ChatError::Upstream(e))
            }
        }
    }

    /// The owner's most recent `limit` messages, oldest-first.
    pub async fn history(&self, owner: &OwnerId, limit: u32) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.history.read_ordered(owner, limit).await?)
    }

    /// Recent history excluding the message just recorded. A failed read
    /// degrades to an empty window.
    async fn read_window(&self, owner: &OwnerId, exclude: Uuid) -> Vec<Message> {
        let window = self.assembler.window();
        let limit = u32::try_from(window).unwrap_or(u32::MAX).saturating_add(1);
        match self.history.read_ordered(owner, limit).await {
            Ok(stored) => {
                let prior: Vec<Message> = stored
                    .iter()
                    .filter(|m| m.id != exclude)
                    .map(ChatMessage::to_llm_message)
                    .collect();
                let start = prior.len().saturating_sub(window);
                prior[start..].to_vec()
            }
            Err(e) => {
                warn!(owner = %owner, error = %e, "History read failed, continuing without context");
                Vec::new()
            }
        }
    }

    async fn finish_buffered(&self, owner: OwnerId, raw: &str) -> Result<String, ChatError> {
        let clean = self.sanitizer.sanitize(raw);
        if clean.is_empty() {
            warn!(owner = %owner, raw_len = raw.len(), "Completion was empty after sanitizing");
            return Err(ChatError::Upstream(LlmError::EmptyResponse));
        }

        let message = ChatMessage::new(owner, MessageRole::Assistant, clean.as_str());
        self.history.append(&message).await?;
        debug!(owner = %owner, message_id = %message.id, "Assistant reply stored");
        Ok(clean)
    }

    /// Forward fragments while accumulating them, then persist the sanitized
    /// whole (or the partial, if the upstream broke off).
    ///
    /// Dropping the returned stream stops the upstream read and skips
    /// persistence.
    fn relay(&self, owner: OwnerId, mut fragments: FragmentStream) -> ReplyStream {
        let history = Arc::clone(&self.history);
        let sanitizer = self.sanitizer.clone();

        Box::pin(async_stream::stream! {
            let mut accumulated = String::new();
            let mut failure = None;

            while let Some(item) = fragments.next().await {
                match item {
                    Ok(text) => {
                        accumulated.push_str(&text);
                        yield Ok(text);
                    }
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }

            let clean = sanitizer.sanitize(&accumulated);
            let interrupted = failure.is_some();
            if clean.is_empty() {
                warn!(owner = %owner, raw_len = accumulated.len(), interrupted, "Streamed reply empty after sanitizing, not stored");
            } else {
                let message = ChatMessage::new(owner, MessageRole::Assistant, clean);
                match history.append(&message).await {
                    Ok(()) => debug!(owner = %owner, message_id = %message.id, interrupted, "Streamed reply stored"),
                    Err(e) => error!(owner = %owner, error = %e, interrupted, "Failed to store streamed reply"),
                }
            }

            if let Some(e) = failure {
                warn!(owner = %owner, error = %e, delivered = accumulated.len(), "Reply stream interrupted");
                yield Err(ChatError::StreamInterrupted(e));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::prompt::{CONTRACT, LEGISLATION, PREAMBLE};
    use crate::llm::box_provider::{BoxLlmProvider, EventStream};
    use crate::llm::provider::LlmProvider;
    use lexchat_types::config::UnterminatedThink;
    use lexchat_types::error::RepositoryError;
    use lexchat_types::llm::{
        CompletionRequest, CompletionResponse, StopReason, StreamEvent, Usage,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    // --- In-memory history store ---

    #[derive(Default)]
    struct MemoryHistoryStore {
        messages: Mutex<Vec<ChatMessage>>,
        fail_reads: AtomicBool,
        fail_user_writes: AtomicBool,
        fail_assistant_writes: AtomicBool,
    }

    impl MemoryHistoryStore {
        fn all(&self) -> Vec<ChatMessage> {
            self.messages.lock().unwrap().clone()
        }

        fn seed(&self, owner: OwnerId, turns: &[(MessageRole, &str)]) {
            let mut messages = self.messages.lock().unwrap();
            for (role, content) in turns {
                messages.push(ChatMessage::new(owner, *role, *content));
            }
        }
    }

    impl HistoryStore for MemoryHistoryStore {
        async fn append(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
            let fail = match message.role {
                MessageRole::Assistant => self.fail_assistant_writes.load(Ordering::SeqCst),
                _ => self.fail_user_writes.load(Ordering::SeqCst),
            };
            if fail {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn read_ordered(
            &self,
            owner: &OwnerId,
            limit: u32,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(RepositoryError::Connection);
            }
            let owned: Vec<ChatMessage> = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| &m.owner_id == owner)
                .cloned()
                .collect();
            let start = owned.len().saturating_sub(limit as usize);
            Ok(owned[start..].to_vec())
        }
    }

    // --- Scripted provider ---

    struct MockProvider {
        reply: Result<String, String>,
        events: Vec<Result<StreamEvent, String>>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(content) => Ok(CompletionResponse {
                    id: "mock-1".to_string(),
                    content: content.clone(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                Err(_) => Err(LlmError::EmptyResponse),
            }
        }

        fn stream(&self, request: CompletionRequest) -> EventStream {
            self.requests.lock().unwrap().push(request);
            let events: Vec<Result<StreamEvent, LlmError>> = self
                .events
                .iter()
                .map(|e| match e {
                    Ok(ev) => Ok(ev.clone()),
                    Err(msg) => Err(LlmError::Stream(msg.clone())),
                })
                .collect();
            Box::pin(futures_util::stream::iter(events))
        }
    }

    struct Harness {
        service: ChatService<MemoryHistoryStore>,
        store: Arc<MemoryHistoryStore>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
        owner: OwnerId,
    }

    fn harness(reply: Result<&str, &str>, events: Vec<Result<StreamEvent, String>>) -> Harness {
        harness_with(reply, events, ChatConfig::default())
    }

    fn harness_with(
        reply: Result<&str, &str>,
        events: Vec<Result<StreamEvent, String>>,
        chat: ChatConfig,
    ) -> Harness {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let provider = MockProvider {
            reply: reply.map(str::to_string).map_err(str::to_string),
            events,
            requests: Arc::clone(&requests),
        };
        let store = Arc::new(MemoryHistoryStore::default());
        let dispatcher = CompletionDispatcher::new(Arc::new(BoxLlmProvider::new(provider)));
        let service = ChatService::new(
            Arc::clone(&store),
            dispatcher,
            &chat,
            GenerationProfiles::default(),
        )
        .unwrap();
        Harness {
            service,
            store,
            requests,
            owner: OwnerId::new(),
        }
    }

    fn delta(text: &str) -> Result<StreamEvent, String> {
        Ok(StreamEvent::TextDelta {
            text: text.to_string(),
        })
    }

    async fn drain(reply: Reply) -> Vec<Result<String, ChatError>> {
        match reply {
            Reply::Streaming(stream) => stream.collect().await,
            Reply::Complete(text) => panic!("expected stream, got {text:?}"),
        }
    }

    fn roles_and_contents(messages: &[ChatMessage]) -> Vec<(MessageRole, String)> {
        messages
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_buffered_turn_with_empty_history() {
        let h = harness(Ok("<think>razonando</think>El Código Civil regula..."), vec![]);

        let reply = h
            .service
            .reply(h.owner, "¿Qué es el código civil?", DeliveryMode::Buffered)
            .await
            .unwrap();
        match reply {
            Reply::Complete(text) => assert_eq!(text, "El Código Civil regula..."),
            other => panic!("expected Complete, got {other:?}"),
        }

        let requests = h.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].messages,
            vec![
                Message::system(PREAMBLE),
                Message::system(LEGISLATION.instruction),
                Message::user("¿Qué es el código civil?"),
            ]
        );
        assert!(!requests[0].stream);

        assert_eq!(
            roles_and_contents(&h.store.all()),
            vec![
                (MessageRole::User, "¿Qué es el código civil?".to_string()),
                (MessageRole::Assistant, "El Código Civil regula...".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_streaming_turn_with_prior_history() {
        let h = harness(
            Ok("unused"),
            vec![
                Ok(StreamEvent::Connected),
                delta("<think>pienso"),
                delta("</think>Un contrato"),
                delta(" es un acuerdo."),
                Ok(StreamEvent::Done),
            ],
        );
        h.store.seed(
            h.owner,
            &[
                (MessageRole::User, "Hola"),
                (MessageRole::Assistant, "Hola, ¿en qué ayudo?"),
            ],
        );

        let reply = h
            .service
            .reply(h.owner, "Explícame un contrato", DeliveryMode::Streaming)
            .await
            .unwrap();
        let fragments: Vec<String> = drain(reply).await.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(
            fragments,
            vec!["<think>pienso", "</think>Un contrato", " es un acuerdo."]
        );

        let requests = h.requests.lock().unwrap().clone();
        assert!(requests[0].stream);
        assert_eq!(
            requests[0].messages,
            vec![
                Message::system(PREAMBLE),
                Message::system(CONTRACT.instruction),
                Message::user("Hola"),
                Message::assistant("Hola, ¿en qué ayudo?"),
                Message::user("Explícame un contrato"),
            ]
        );

        let stored = h.store.all();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored[3].role, MessageRole::Assistant);
        assert_eq!(stored[3].content, "Un contrato es un acuerdo.");
    }

    #[tokio::test]
    async fn test_legislation_question_end_to_end() {
        let h = harness(Ok("El Código Civil regula los contratos en su libro cuarto."), vec![]);
        let question = "¿Qué dice el código sobre contratos?";

        let reply = h
            .service
            .reply(h.owner, question, DeliveryMode::Buffered)
            .await
            .unwrap();
        assert!(matches!(reply, Reply::Complete(_)));

        let requests = h.requests.lock().unwrap().clone();
        assert_eq!(
            requests[0].messages,
            vec![
                Message::system(PREAMBLE),
                Message::system(LEGISLATION.instruction),
                Message::user(question),
            ]
        );

        assert_eq!(
            roles_and_contents(&h.store.all()),
            vec![
                (MessageRole::User, question.to_string()),
                (
                    MessageRole::Assistant,
                    "El Código Civil regula los contratos en su libro cuarto.".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_unanswered_user_turn_merges_with_new_message() {
        let h = harness(Ok("Entendido."), vec![]);
        h.store.seed(
            h.owner,
            &[
                (MessageRole::User, "Hola"),
                (MessageRole::Assistant, "Hola, ¿en qué ayudo?"),
                (MessageRole::User, "Y también esto"),
            ],
        );

        h.service
            .reply(h.owner, "nuevo", DeliveryMode::Buffered)
            .await
            .unwrap();

        let requests = h.requests.lock().unwrap().clone();
        let messages = &requests[0].messages;
        assert_eq!(
            messages[messages.len() - 2..],
            [
                Message::assistant("Hola, ¿en qué ayudo?"),
                Message::user("Y también esto\nnuevo"),
            ]
        );
        // Stored history keeps both user turns apart.
        let stored = roles_and_contents(&h.store.all());
        assert_eq!(stored[3], (MessageRole::User, "nuevo".to_string()));
        assert_eq!(stored[4], (MessageRole::Assistant, "Entendido.".to_string()));
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_side_effects() {
        let h = harness(Ok("x"), vec![]);
        let err = h
            .service
            .reply(h.owner, "   \n", DeliveryMode::Buffered)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidRequest(_)));
        assert!(h.store.all().is_empty());
        assert!(h.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_write_failure_aborts_before_dispatch() {
        let h = harness(Ok("x"), vec![]);
        h.store.fail_user_writes.store(true, Ordering::SeqCst);

        let err = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Buffered)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Persistence(_)));
        assert!(h.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_read_failure_fails_open() {
        let h = harness(Ok("respuesta"), vec![]);
        h.store.seed(h.owner, &[(MessageRole::User, "viejo")]);
        h.store.fail_reads.store(true, Ordering::SeqCst);

        let reply = h
            .service
            .reply(h.owner, "nuevo", DeliveryMode::Buffered)
            .await
            .unwrap();
        assert!(matches!(reply, Reply::Complete(ref t) if t == "respuesta"));

        let requests = h.requests.lock().unwrap().clone();
        assert_eq!(requests[0].messages.len(), 3);
        assert_eq!(requests[0].messages[2], Message::user("nuevo"));
    }

    #[tokio::test]
    async fn test_buffered_empty_response_is_upstream_error() {
        let h = harness(Err("no choices"), vec![]);
        let err = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Buffered)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Upstream(LlmError::EmptyResponse)));

        let stored = h.store.all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_buffered_reasoning_only_reply_not_stored() {
        let h = harness(Ok("<think>solo pienso</think>\n\n"), vec![]);
        let err = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Buffered)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Upstream(_)));
        assert_eq!(h.store.all().len(), 1);
    }

    #[tokio::test]
    async fn test_buffered_assistant_write_failure_surfaces() {
        let h = harness(Ok("respuesta"), vec![]);
        h.store.fail_assistant_writes.store(true, Ordering::SeqCst);
        let err = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Buffered)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_window_limits_prompt_and_excludes_new_message() {
        let chat = ChatConfig {
            history_window: 4,
            unterminated_think: UnterminatedThink::Preserve,
        };
        let h = harness_with(Ok("ok"), vec![], chat);
        let turns: Vec<(MessageRole, String)> = (0..12)
            .map(|i| {
                let role = if i % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                };
                (role, format!("m{i}"))
            })
            .collect();
        let borrowed: Vec<(MessageRole, &str)> =
            turns.iter().map(|(r, c)| (*r, c.as_str())).collect();
        h.store.seed(h.owner, &borrowed);

        h.service
            .reply(h.owner, "pregunta", DeliveryMode::Buffered)
            .await
            .unwrap();

        let requests = h.requests.lock().unwrap().clone();
        let contents: Vec<&str> = requests[0].messages[2..]
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["m8", "m9", "m10", "m11", "pregunta"]);
    }

    #[tokio::test]
    async fn test_history_is_scoped_per_owner() {
        let h = harness(Ok("ok"), vec![]);
        let other = OwnerId::new();
        h.store.seed(other, &[(MessageRole::User, "ajeno")]);

        h.service
            .reply(h.owner, "mío", DeliveryMode::Buffered)
            .await
            .unwrap();

        let requests = h.requests.lock().unwrap().clone();
        assert_eq!(requests[0].messages.len(), 3);
        let mine = h.service.history(&h.owner, 100).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|m| m.owner_id == h.owner));
    }

    #[tokio::test]
    async fn test_streaming_connect_failure_is_upstream_error() {
        let h = harness(Ok("unused"), vec![Err("connection refused".to_string())]);
        let err = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Streaming)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Upstream(LlmError::Stream(_))));
        assert_eq!(h.store.all().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_interruption_persists_sanitized_partial() {
        let h = harness(
            Ok("unused"),
            vec![
                Ok(StreamEvent::Connected),
                delta("<think>a</think>Parcial"),
                delta(" respuesta"),
                Err("reset by peer".to_string()),
            ],
        );
        let reply = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Streaming)
            .await
            .unwrap();
        let items = drain(reply).await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap(), "<think>a</think>Parcial");
        assert!(matches!(items[2], Err(ChatError::StreamInterrupted(_))));

        let stored = h.store.all();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].content, "Parcial respuesta");
    }

    #[tokio::test]
    async fn test_stream_interruption_with_failed_persist_only_logs() {
        let h = harness(
            Ok("unused"),
            vec![
                Ok(StreamEvent::Connected),
                delta("Parcial"),
                Err("reset".to_string()),
            ],
        );
        h.store.fail_assistant_writes.store(true, Ordering::SeqCst);
        let reply = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Streaming)
            .await
            .unwrap();
        let items = drain(reply).await;
        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(ChatError::StreamInterrupted(_))));
        assert_eq!(h.store.all().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_completed_with_failed_persist_still_delivers() {
        let h = harness(
            Ok("unused"),
            vec![Ok(StreamEvent::Connected), delta("Hola"), Ok(StreamEvent::Done)],
        );
        h.store.fail_assistant_writes.store(true, Ordering::SeqCst);
        let reply = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Streaming)
            .await
            .unwrap();
        let items = drain(reply).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap(), "Hola");
    }

    #[tokio::test]
    async fn test_stream_of_only_reasoning_not_stored() {
        let h = harness(
            Ok("unused"),
            vec![Ok(StreamEvent::Connected), delta("<think>x</think>"), Ok(StreamEvent::Done)],
        );
        let reply = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Streaming)
            .await
            .unwrap();
        let items = drain(reply).await;
        assert_eq!(items.len(), 1);
        assert_eq!(h.store.all().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_stream_skips_persistence() {
        let h = harness(
            Ok("unused"),
            vec![
                Ok(StreamEvent::Connected),
                delta("uno"),
                delta("dos"),
                Ok(StreamEvent::Done),
            ],
        );
        let reply = h
            .service
            .reply(h.owner, "hola", DeliveryMode::Streaming)
            .await
            .unwrap();
        let Reply::Streaming(mut stream) = reply else {
            panic!("expected stream");
        };
        assert_eq!(stream.next().await.unwrap().unwrap(), "uno");
        drop(stream);

        assert_eq!(h.store.all().len(), 1);
    }
}
