// GraphQL server implementation for Dice Messages
// This binds the schema to an HTTP endpoint and serves the GraphiQL explorer

use std::net::SocketAddr;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql::parser::{parse_query, types::OperationType};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequest, State},
    http::{
        header::{ACCEPT, ALLOW},
        HeaderMap, StatusCode,
    },
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router, Server,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::engine::{
    graphql::{create_schema_with_storage, DiceMessagesSchema, RemoteAddr},
    storage::{InMemoryMessageStorage, MessageStorage},
};
use crate::server::middleware::log_remote_addr;
use crate::{DiceMessagesError, Result};

/// Path of the GraphQL endpoint
pub const GRAPHQL_PATH: &str = "/graphql";

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub schema: DiceMessagesSchema,
    pub storage: Arc<dyn MessageStorage>,
    pub graphiql_enabled: bool,
}

impl AppState {
    pub fn new(storage: Arc<dyn MessageStorage>, graphiql_enabled: bool) -> Self {
        Self {
            schema: create_schema_with_storage(storage.clone()),
            storage,
            graphiql_enabled,
        }
    }
}

/// Build the axum router for the GraphQL API
///
/// Routes:
/// - `POST /graphql`: execute a GraphQL request
/// - `GET /graphql`: GraphiQL for browsers, otherwise execute the query string
/// - `GET /`: GraphiQL
/// - `GET /health`: liveness check
pub fn create_router(state: AppState, cors_enabled: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(graphiql))
        .route(GRAPHQL_PATH, get(graphql_get_handler).post(graphql_handler))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(log_remote_addr))
        .with_state(state);

    if cors_enabled {
        app = app.layer(CorsLayer::permissive());
    }

    app
}

/// GraphQL server
pub struct GraphQLServer {
    config: ServerConfig,
    storage: Arc<dyn MessageStorage>,
}

impl GraphQLServer {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            storage: Arc::new(InMemoryMessageStorage::new()),
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn MessageStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn router(&self) -> Router {
        let state = AppState::new(self.storage.clone(), self.config.graphiql_enabled);
        create_router(state, self.config.cors_enabled)
    }

    pub async fn run(self) -> Result<()> {
        let app = self.router();

        let bind_address = self.config.bind_address();
        let addr = tokio::net::lookup_host(&bind_address)
            .await?
            .next()
            .ok_or_else(|| {
                DiceMessagesError::Internal(format!("Could not resolve {}", bind_address))
            })?;

        info!("🚀 GraphQL server running on http://{}", addr);
        info!("🔗 GraphQL endpoint: http://{}{}", addr, GRAPHQL_PATH);
        if self.config.graphiql_enabled {
            info!("📊 GraphiQL interface: http://{}{}", addr, GRAPHQL_PATH);
        }

        Server::try_bind(&addr)
            .map_err(|e| DiceMessagesError::Internal(format!("Failed to bind {}: {}", addr, e)))?
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DiceMessagesError::Internal(e.to_string()))?;

        info!("👋 GraphQL server stopped");
        Ok(())
    }
}

impl Default for GraphQLServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring and starting a [`GraphQLServer`]
pub struct GraphQLServerBuilder {
    server: GraphQLServer,
}

impl GraphQLServerBuilder {
    pub fn new() -> Self {
        Self {
            server: GraphQLServer::new(),
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.server = self.server.with_config(config);
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn MessageStorage>) -> Self {
        self.server = self.server.with_storage(storage);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.config.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.server.config.port = port;
        self
    }

    pub async fn build_and_run(self) -> Result<()> {
        self.server.run().await
    }
}

impl Default for GraphQLServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Rejection produced when a request body or query string is not a GraphQL request
type GraphQLRejection = <GraphQLRequest as FromRequest<AppState, Body>>::Rejection;

async fn execute(
    state: &AppState,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    mut request: async_graphql::Request,
) -> GraphQLResponse {
    if let Some(ConnectInfo(addr)) = connect_info {
        request = request.data(RemoteAddr(addr));
    }
    state.schema.execute(request).await.into()
}

// GraphQL handler
async fn graphql_handler(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    execute(&state, connect_info, req.into_inner()).await
}

// GET requests: browsers get the explorer, everything else runs the query string
async fn graphql_get_handler(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    req: std::result::Result<GraphQLRequest, GraphQLRejection>,
) -> Response {
    if state.graphiql_enabled && accepts_html(&headers) {
        debug!("Serving GraphiQL");
        return graphiql_page().into_response();
    }

    let request = match req {
        Ok(req) => req.into_inner(),
        Err(rejection) => return rejection.into_response(),
    };

    // Mutations change the store, so they are only accepted over POST
    if is_mutation(&request) {
        warn!("Rejected mutation sent with GET");
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(ALLOW, "POST")],
            "Can only perform a mutation operation from a POST request.",
        )
            .into_response();
    }

    execute(&state, connect_info, request).await.into_response()
}

/// Whether the operation `request` would run is a mutation
///
/// Documents that fail to parse are left for the executor to report.
fn is_mutation(request: &async_graphql::Request) -> bool {
    let document = match parse_query(&request.query) {
        Ok(document) => document,
        Err(_) => return false,
    };

    document.operations.iter().any(|(name, operation)| {
        let selected = match (&request.operation_name, name) {
            (Some(wanted), Some(name)) => name.as_str() == wanted,
            _ => true,
        };
        selected && operation.node.ty == OperationType::Mutation
    })
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.contains("text/html"))
}

fn graphiql_page() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

// GraphiQL interface
async fn graphiql(State(state): State<AppState>) -> Response {
    if state.graphiql_enabled {
        graphiql_page().into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Response {
    match state.storage.message_count().await {
        Ok(count) => (
            StatusCode::OK,
            format!("Dice Messages GraphQL Server is running! ({} messages)", count),
        )
            .into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}
