//! History store trait definition.

use lexchat_types::chat::ChatMessage;
use lexchat_types::error::RepositoryError;
use lexchat_types::identity::OwnerId;

/// Append-only log of chat messages, partitioned by owner.
///
/// Implementations live in lexchat-infra (e.g., `SqliteHistoryStore`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait HistoryStore: Send + Sync {
    /// Durably record one message. Content is stored as given.
    fn append(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The owner's `limit` most recent messages, returned oldest-first.
    fn read_ordered(
        &self,
        owner: &OwnerId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
