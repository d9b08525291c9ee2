// Messages - the records kept by the message store
//
// A message is a tiny record with two optional text fields. Clients never
// choose the id: the server generates one when the message is created and
// it never changes afterwards. Updates replace the whole body, so a field
// left out of an update becomes unset.

use std::fmt::Write;

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Number of random bytes behind every message id
pub const MESSAGE_ID_BYTES: usize = 10;

/// **Message Body** - the client-supplied part of a message
///
/// This is what the store keeps under each id. Both fields are optional;
/// an empty body is a valid message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageInput {
    pub content: Option<String>,
    pub author: Option<String>,
}

impl MessageInput {
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            author: Some(author.into()),
        }
    }
}

/// **Message** - a stored body together with its server-generated id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl Message {
    /// Rebuild a message from its id and stored body
    ///
    /// ## Rust Learning Notes:
    ///
    /// ### Struct Destructuring
    /// `let MessageInput { content, author } = input;` moves both fields
    /// out of the body in one step, so no clones are needed.
    pub fn from_input(id: impl Into<String>, input: MessageInput) -> Self {
        let MessageInput { content, author } = input;
        Self {
            id: id.into(),
            content,
            author,
        }
    }
}

/// Generate a fresh message id using the thread-local RNG
pub fn generate_message_id() -> String {
    generate_message_id_with(&mut rand::thread_rng())
}

/// Generate a message id from the given random source
///
/// The id is [`MESSAGE_ID_BYTES`] random bytes rendered as lowercase hex,
/// so it is always twice that many characters long.
pub fn generate_message_id_with<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; MESSAGE_ID_BYTES];
    rng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .fold(String::with_capacity(MESSAGE_ID_BYTES * 2), |mut id, byte| {
            // Writing into a String cannot fail
            let _ = write!(id, "{:02x}", byte);
            id
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_message_from_input() {
        let message = Message::from_input("abc", MessageInput::new("hi", "alice"));

        assert_eq!(message.id, "abc");
        assert_eq!(message.content.as_deref(), Some("hi"));
        assert_eq!(message.author.as_deref(), Some("alice"));
    }

    #[test]
    fn test_empty_input_is_valid() {
        let message = Message::from_input("abc", MessageInput::default());

        assert!(message.content.is_none());
        assert!(message.author.is_none());
    }

    #[test]
    fn test_message_id_format() {
        for _ in 0..100 {
            let id = generate_message_id();
            assert_eq!(id.len(), 20);
            assert!(id
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_message_id_is_seed_dependent() {
        let a = generate_message_id_with(&mut StdRng::seed_from_u64(1));
        let b = generate_message_id_with(&mut StdRng::seed_from_u64(1));
        let c = generate_message_id_with(&mut StdRng::seed_from_u64(2));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_message_ids_are_distinct() {
        let first = generate_message_id();
        let second = generate_message_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_message_serialization() {
        let message = Message::from_input("abc", MessageInput::new("hi", "alice"));
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": "abc", "content": "hi", "author": "alice"})
        );
    }
}
