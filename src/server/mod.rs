// Dice Messages Server Implementations
// This contains the HTTP server that exposes the GraphQL engine

//! # Server Module
//!
//! The server layer sits on top of the engine layer and makes the schema
//! reachable over HTTP.
//!
//! ```text
//! Client (any language)
//!        ↓ HTTP/GraphQL
//! Server Layer (this module) ← axum router, logging middleware, GraphiQL
//!        ↓ async-graphql
//! Engine Layer ← schema, resolvers, storage
//! ```

/// GraphQL HTTP server implementation
///
/// Contains:
/// - Axum router with the `/graphql` endpoint
/// - GraphiQL explorer and health check
/// - Builder pattern for server configuration
pub mod graphql;

/// Request logging middleware
pub mod middleware;

pub use graphql::{create_router, AppState, GraphQLServer, GraphQLServerBuilder, GRAPHQL_PATH};
