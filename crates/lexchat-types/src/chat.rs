//! Persisted chat message types for lexchat.
//!
//! A conversation is the append-only log of messages belonging to one
//! owner, ordered by `created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::OwnerId;
use crate::llm::Message;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// A single persisted message in an owner's conversation log.
///
/// Messages are appended once and never edited. `id` is a UUID v7 so ties
/// on `created_at` still sort in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a new message stamped with the current time.
    pub fn new(owner_id: OwnerId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            owner_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// The role/content pair sent to the completion endpoint.
    pub fn to_llm_message(&self) -> Message {
        Message {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_new_stamps_fields() {
        let owner = OwnerId::new();
        let msg = ChatMessage::new(owner, MessageRole::User, "Hola");
        assert_eq!(msg.owner_id, owner);
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "Hola");
    }

    #[test]
    fn test_chat_message_ids_are_time_ordered() {
        let owner = OwnerId::new();
        let first = ChatMessage::new(owner, MessageRole::User, "a");
        let second = ChatMessage::new(owner, MessageRole::Assistant, "b");
        assert!(first.id < second.id);
        assert!(first.created_at <= second.created_at);
    }

    #[test]
    fn test_to_llm_message() {
        let msg = ChatMessage::new(OwnerId::new(), MessageRole::Assistant, "Respuesta");
        let llm = msg.to_llm_message();
        assert_eq!(llm.role, MessageRole::Assistant);
        assert_eq!(llm.content, "Respuesta");
    }
}
