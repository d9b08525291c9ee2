// Dice Messages - Rust Edition
// A small GraphQL API for dice rolls, canned quotes and an in-memory message board

//! # Dice Messages Library
//!
//! This is the library root. It wires together the layers of the service
//! and defines the public API that the binaries (and tests) use.
//!
//! ## Layers
//!
//! ```text
//! Client (GraphiQL, admin CLI, any HTTP client)
//!        ↓ HTTP POST/GET /graphql
//! Server Layer (server) ← axum router, request logging, GraphiQL
//!        ↓ async-graphql execution
//! Engine Layer (engine) ← Query/Mutation resolvers, message storage
//!        ↓ function calls
//! Domain Layer (models) ← messages, dice, id generation
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dice_messages::{GraphQLServerBuilder, ServerConfig};
//!
//! # async fn run() -> dice_messages::Result<()> {
//! GraphQLServerBuilder::new()
//!     .with_config(ServerConfig::default())
//!     .build_and_run()
//!     .await
//! # }
//! ```

// Core domain models
pub mod models;

// GraphQL schema, resolvers and storage
pub mod engine;

// HTTP server setup
pub mod server;

// Server configuration
pub mod config;

pub use models::{Message, MessageInput, RandomDie};

pub use engine::{
    graphql::{
        create_schema, create_schema_with_storage, DiceMessagesSchema, MessageGQL,
        MessageInputGQL, Mutation, Query, RandomDieGQL, RemoteAddr,
    },
    storage::{InMemoryMessageStorage, MessageStorage},
};

pub use server::graphql::GraphQLServerBuilder;

pub use config::ServerConfig;

use thiserror::Error;

/// Error types for Dice Messages operations
///
/// ## Rust Learning Notes:
///
/// ### The `thiserror` Crate
/// - `#[derive(Error)]` implements the `std::error::Error` trait
/// - `#[error("...")]` provides the `Display` message
/// - `#[from]` enables automatic conversion with the `?` operator
#[derive(Error, Debug)]
pub enum DiceMessagesError {
    /// No message is stored under the requested id
    #[error("no message exists with id {id}")]
    MessageNotFound { id: String },

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for DiceMessagesError {
    fn from(err: std::io::Error) -> Self {
        DiceMessagesError::Internal(err.to_string())
    }
}

/// Type alias for Results that use our custom error type
pub type Result<T> = std::result::Result<T, DiceMessagesError>;
