// Domain models - language-agnostic values behind the GraphQL API

//! # Dice Messages Domain Models
//!
//! Plain Rust values with no GraphQL or HTTP knowledge. The engine layer
//! translates them into GraphQL types.
//!
//! - [`Message`] / [`MessageInput`]: records kept by the message store
//! - [`RandomDie`]: an ephemeral die with a side count
//!
//! The `pub use` statements at the bottom create a flat API.

/// Message records and id generation
pub mod message;

/// Dice and random integer draws
pub mod die;

pub use message::{generate_message_id, generate_message_id_with, Message, MessageInput};

pub use die::{draw, roll_dice, sides_or_default, RandomDie, DEFAULT_SIDES};
