// Storage abstraction for the message board
// This defines the interface for keeping messages between requests

//! # Storage Abstraction Layer
//!
//! The message store maps server-generated ids to message bodies. It sits
//! behind the [`MessageStorage`] trait so the GraphQL layer never touches a
//! concrete map, and every test can build its own independent store.
//!
//! ## Thread Safety
//!
//! [`InMemoryMessageStorage`] guards its map with `tokio::sync::RwLock`:
//! - Multiple readers can look up messages at the same time
//! - Creates and updates are serialized; the last write to an id wins
//!
//! ## Rust Learning Notes:
//!
//! - Async traits with the async-trait crate
//! - Trait objects (`Arc<dyn MessageStorage>`) for dependency injection
//! - Typed errors instead of exceptions for missing records

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{generate_message_id, Message, MessageInput};
use crate::{DiceMessagesError, Result};

/// Storage trait for message persistence
///
/// Lookups and updates of an unknown id fail with
/// [`DiceMessagesError::MessageNotFound`] rather than returning `Option`,
/// so callers can pass the error straight through to the GraphQL layer.
#[async_trait::async_trait]
pub trait MessageStorage: Send + Sync {
    /// Store `input` under a freshly generated id and return the new message
    async fn create_message(&self, input: MessageInput) -> Result<Message>;

    /// Look up a message by id
    async fn get_message(&self, id: &str) -> Result<Message>;

    /// Replace the body stored under `id` with `input`
    ///
    /// Fields missing from `input` become unset; nothing is merged.
    async fn update_message(&self, id: &str, input: MessageInput) -> Result<Message>;

    /// Number of messages currently stored
    async fn message_count(&self) -> Result<usize>;
}

/// In-memory storage implementation
///
/// ## Limitations
///
/// - **Not persistent**: Data is lost when the process restarts
/// - **Not bounded**: Messages are never evicted
#[derive(Default)]
pub struct InMemoryMessageStorage {
    /// Key: message id, Value: stored body
    messages: RwLock<HashMap<String, MessageInput>>,
}

impl InMemoryMessageStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MessageStorage for InMemoryMessageStorage {
    async fn create_message(&self, input: MessageInput) -> Result<Message> {
        let mut messages = self.messages.write().await;

        // Ids are random; regenerate on the (practically impossible) collision
        let mut id = generate_message_id();
        while messages.contains_key(&id) {
            id = generate_message_id();
        }

        messages.insert(id.clone(), input.clone());
        debug!("Created message {}", id);

        Ok(Message::from_input(id, input))
    }

    async fn get_message(&self, id: &str) -> Result<Message> {
        let messages = self.messages.read().await;

        messages
            .get(id)
            .cloned()
            .map(|input| Message::from_input(id, input))
            .ok_or_else(|| DiceMessagesError::MessageNotFound { id: id.to_string() })
    }

    async fn update_message(&self, id: &str, input: MessageInput) -> Result<Message> {
        let mut messages = self.messages.write().await;

        match messages.get_mut(id) {
            Some(stored) => {
                *stored = input.clone();
                debug!("Updated message {}", id);
                Ok(Message::from_input(id, input))
            }
            None => Err(DiceMessagesError::MessageNotFound { id: id.to_string() }),
        }
    }

    async fn message_count(&self) -> Result<usize> {
        Ok(self.messages.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let storage = InMemoryMessageStorage::new();

        let created = storage
            .create_message(MessageInput::new("a", "b"))
            .await
            .unwrap();
        let fetched = storage.get_message(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.content.as_deref(), Some("a"));
        assert_eq!(fetched.author.as_deref(), Some("b"));
        assert_eq!(created.id.len(), 20);
    }

    #[tokio::test]
    async fn test_get_is_idempotent() {
        let storage = InMemoryMessageStorage::new();
        let created = storage
            .create_message(MessageInput::new("a", "b"))
            .await
            .unwrap();

        let first = storage.get_message(&created.id).await.unwrap();
        let second = storage.get_message(&created.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_update_replaces_whole_body() {
        let storage = InMemoryMessageStorage::new();
        let created = storage
            .create_message(MessageInput::new("a", "b"))
            .await
            .unwrap();

        let update = MessageInput {
            content: Some("c".to_string()),
            author: None,
        };
        let updated = storage.update_message(&created.id, update).await.unwrap();
        assert_eq!(updated.id, created.id);

        let fetched = storage.get_message(&created.id).await.unwrap();
        assert_eq!(fetched.content.as_deref(), Some("c"));
        assert!(fetched.author.is_none());
    }

    #[tokio::test]
    async fn test_missing_message() {
        let storage = InMemoryMessageStorage::new();

        let err = storage.get_message("doesnotexist").await.unwrap_err();
        assert!(matches!(err, DiceMessagesError::MessageNotFound { ref id } if id == "doesnotexist"));
        assert_eq!(err.to_string(), "no message exists with id doesnotexist");

        let err = storage
            .update_message("doesnotexist", MessageInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no message exists with id doesnotexist");

        // A failed update must not create the record
        assert_eq!(storage.message_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_consecutive_creates_get_distinct_ids() {
        let storage = InMemoryMessageStorage::new();
        let first = storage.create_message(MessageInput::default()).await.unwrap();
        let second = storage.create_message(MessageInput::default()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(storage.message_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stores_are_independent() {
        let first = InMemoryMessageStorage::new();
        let second = InMemoryMessageStorage::new();

        let created = first.create_message(MessageInput::new("a", "b")).await.unwrap();
        tokio_test::assert_ok!(first.get_message(&created.id).await);
        tokio_test::assert_err!(second.get_message(&created.id).await);
    }

    #[tokio::test]
    async fn test_concurrent_creates() {
        let storage: Arc<dyn MessageStorage> = Arc::new(InMemoryMessageStorage::new());

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .create_message(MessageInput::new(format!("msg {}", i), "load"))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(storage.message_count().await.unwrap(), 50);
    }
}
