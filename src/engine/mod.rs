// Dice Messages Engine
// This contains the GraphQL schema and the storage it resolves against

//! # Engine Module
//!
//! The layer between the domain models and the HTTP server.
//!
//! ### GraphQL Engine (`graphql` module)
//! - `Query` and `Mutation` roots with one resolver per field
//! - GraphQL views of the domain models (`MessageGQL`, `RandomDieGQL`, ...)
//! - Schema building functions
//!
//! ### Storage Engine (`storage` module)
//! - `MessageStorage` trait
//! - In-memory implementation, injected into the schema as data

/// GraphQL schema definitions and resolvers
pub mod graphql;

/// Message storage abstraction and in-memory implementation
pub mod storage;

pub use graphql::{
    create_schema, create_schema_with_storage, DiceMessagesSchema, MessageGQL, MessageInputGQL,
    RandomDieGQL, RemoteAddr,
};

pub use storage::{InMemoryMessageStorage, MessageStorage};
